use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("invalid page url {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// A loaded page: its full address and the HTML source of its DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    url: Url,
    html: String,
}

impl PageSnapshot {
    pub fn new(url: &str, html: impl Into<String>) -> Result<Self, PageError> {
        let url = Url::parse(url.trim()).map_err(|err| PageError::InvalidUrl {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            url,
            html: html.into(),
        })
    }

    /// Full address of the page, as the browser would report `location.href`.
    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    /// Hostname, empty for hostless urls such as `file:` pages.
    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}
