use scraper::{ElementRef, Html, Selector};
use tracker_core::ExtractionResult;
use tracker_logging::{tracker_debug, tracker_warn};

use crate::text::rendered_text;
use crate::PageSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
}

/// Site-specific scraping strategy, chosen by hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteStrategy {
    LinkedIn,
    Foorilla,
    Generic,
}

/// Known hosts, checked in order; first substring match wins.
const KNOWN_SITES: &[(&str, SiteStrategy)] = &[
    ("linkedin.com", SiteStrategy::LinkedIn),
    ("foorilla.com", SiteStrategy::Foorilla),
];

// LinkedIn ships several job views (collections, search, direct); newest classes first.
const LINKEDIN_TITLE: &[&str] = &[
    ".job-details-jobs-unified-top-card__job-title",
    ".jobs-unified-top-card__job-title",
    "h1.t-24",
    ".jobs-details-top-card__job-title",
];
const LINKEDIN_COMPANY: &[&str] = &[
    ".job-details-jobs-unified-top-card__company-name",
    ".jobs-unified-top-card__company-name",
    ".jobs-details-top-card__company-info a",
];
const LINKEDIN_DESCRIPTION: &[&str] = &[
    "#job-details",
    ".jobs-description__content",
    ".jobs-description-content__text",
    ".job-view-layout .jobs-description",
];

const FOORILLA_CONTAINER: &str = "#mc_2";
const FOORILLA_COMPANY_LINK: &str = r#"a[href*="/hiring/companies/"]"#;
const FOORILLA_COMPANY_FALLBACK: &str = ".hstack div:first-child";

const GENERIC_DESCRIPTION: &[&str] = &[
    "article",
    "main",
    ".job-description",
    "#job-description",
    ".description",
];

impl SiteStrategy {
    pub fn for_host(hostname: &str) -> Self {
        KNOWN_SITES
            .iter()
            .find(|(host, _)| hostname.contains(host))
            .map(|(_, strategy)| *strategy)
            .unwrap_or(SiteStrategy::Generic)
    }

    fn run(self, doc: &Html, href: &str) -> Result<ExtractionResult, ExtractError> {
        let root = doc.root_element();
        match self {
            SiteStrategy::LinkedIn => Ok(ExtractionResult {
                title: first_text(root, LINKEDIN_TITLE)?,
                company: first_text(root, LINKEDIN_COMPANY)?,
                url: Some(href.to_string()),
                description: Some(first_text(root, LINKEDIN_DESCRIPTION)?.unwrap_or_default()),
                error: None,
            }),
            SiteStrategy::Foorilla => {
                let Some(container) = select_first(root, FOORILLA_CONTAINER)? else {
                    return Ok(ExtractionResult::default());
                };
                let company = match select_first(container, FOORILLA_COMPANY_LINK)? {
                    Some(link) => rendered_text(link).replace('@', "").trim().to_string(),
                    None => first_text(container, &[FOORILLA_COMPANY_FALLBACK])?
                        .unwrap_or_default(),
                };
                Ok(ExtractionResult {
                    title: Some(first_text(container, &["h1"])?.unwrap_or_default()),
                    company: Some(company),
                    url: Some(href.to_string()),
                    description: Some(rendered_text(container)),
                    error: None,
                })
            }
            SiteStrategy::Generic => {
                let title = match first_text(root, &["h1"])?.filter(|t| !t.is_empty()) {
                    Some(heading) => heading,
                    None => first_text(root, &["title"])?.unwrap_or_default(),
                };
                let description = match first_text(root, GENERIC_DESCRIPTION)?
                    .filter(|t| !t.is_empty())
                {
                    Some(text) => text,
                    None => meta_content(root, "description")?.unwrap_or_default(),
                };
                Ok(ExtractionResult {
                    title: Some(title),
                    company: Some(meta_content(root, "og:site_name")?.unwrap_or_default()),
                    url: Some(href.to_string()),
                    description: Some(description),
                    error: None,
                })
            }
        }
    }
}

/// Scrapes job fields from a page, never failing past its boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobExtractor;

impl JobExtractor {
    /// Runs extraction; internal failures come back as `ExtractionResult { error, .. }`.
    pub fn extract(&self, page: &PageSnapshot) -> ExtractionResult {
        match self.try_extract(page) {
            Ok(result) => result,
            Err(err) => {
                tracker_warn!("Extraction failed on {}: {}", page.href(), err);
                ExtractionResult::failure(err.to_string())
            }
        }
    }

    pub fn try_extract(&self, page: &PageSnapshot) -> Result<ExtractionResult, ExtractError> {
        let doc = Html::parse_document(page.html());
        let strategy = SiteStrategy::for_host(page.hostname());
        tracker_debug!("Host {:?} uses {:?} strategy", page.hostname(), strategy);

        let mut result = match strategy {
            SiteStrategy::Generic => ExtractionResult::default(),
            site => site.run(&doc, page.href())?,
        };

        if !result.has_title() {
            tracker_debug!("No title from {:?}, merging generic fields", strategy);
            result.fill_missing_from(SiteStrategy::Generic.run(&doc, page.href())?);
        }

        result.url = Some(page.href().to_string());
        Ok(result)
    }
}

fn parse_selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|err| ExtractError::Selector {
        selector: css.to_string(),
        message: err.to_string(),
    })
}

fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>, ExtractError> {
    let selector = parse_selector(css)?;
    Ok(scope.select(&selector).next())
}

/// Text of the first candidate that matches any node; later candidates are
/// only tried when earlier ones match nothing.
fn first_text(scope: ElementRef<'_>, candidates: &[&str]) -> Result<Option<String>, ExtractError> {
    for css in candidates {
        if let Some(element) = select_first(scope, css)? {
            return Ok(Some(rendered_text(element)));
        }
    }
    Ok(None)
}

fn meta_content(scope: ElementRef<'_>, name: &str) -> Result<Option<String>, ExtractError> {
    let css = format!(r#"meta[name="{name}"], meta[property="{name}"]"#);
    Ok(select_first(scope, &css)?
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty()))
}
