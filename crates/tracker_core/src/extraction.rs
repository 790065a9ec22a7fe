use serde::{Deserialize, Serialize};

/// Best-effort job fields scraped from a page.
///
/// Each field is independent: `None` means that field could not be found,
/// not that extraction failed. A hard failure is reported through `error`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// True when `title` holds a non-empty value.
    pub fn has_title(&self) -> bool {
        present(&self.title).is_some()
    }

    /// Copies each field of `fallback` into `self` where `self` has no usable value.
    ///
    /// Fields already present (non-empty) in `self` are kept even when `fallback`
    /// also has them.
    pub fn fill_missing_from(&mut self, fallback: ExtractionResult) {
        fill(&mut self.title, fallback.title);
        fill(&mut self.company, fallback.company);
        fill(&mut self.url, fallback.url);
        fill(&mut self.description, fallback.description);
    }
}

pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn fill(slot: &mut Option<String>, fallback: Option<String>) {
    if present(slot).is_none() && fallback.is_some() {
        *slot = fallback;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn fill_missing_keeps_present_fields() {
        let mut site = ExtractionResult {
            title: Some(String::new()),
            company: some("Acme"),
            ..ExtractionResult::default()
        };
        site.fill_missing_from(ExtractionResult {
            title: some("Generic"),
            company: some("Other"),
            description: some("Body"),
            ..ExtractionResult::default()
        });

        assert_eq!(site.title, some("Generic"));
        assert_eq!(site.company, some("Acme"));
        assert_eq!(site.description, some("Body"));
        assert_eq!(site.url, None);
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let json = serde_json::to_value(ExtractionResult::failure("boom")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "boom" }));
    }
}
