use serde_json::Value;
use tracker_logging::{tracker_debug, tracker_info};

use crate::{JobExtractor, PageSnapshot, Request};

/// A page's execution context, where the extractor's message listener lives.
///
/// The listener is registered at most once per context, however many times the
/// extractor is injected.
#[derive(Debug, Clone)]
pub struct PageContext {
    page: PageSnapshot,
    listener: Option<JobExtractor>,
}

impl PageContext {
    pub fn new(page: PageSnapshot) -> Self {
        Self {
            page,
            listener: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// Loads the extractor into this context. Returns `false` when it was
    /// already registered, in which case nothing changes.
    pub fn attach(&mut self, extractor: JobExtractor) -> bool {
        if self.listener.is_some() {
            tracker_debug!("Extractor already loaded in {}", self.page.href());
            return false;
        }
        self.listener = Some(extractor);
        tracker_info!("Extractor loaded in {}", self.page.href());
        true
    }

    /// Delivers a runtime message. `None` means nothing in the page answered.
    pub fn deliver(&self, message: &Value) -> Option<Value> {
        let extractor = self.listener.as_ref()?;
        match serde_json::from_value::<Request>(message.clone()) {
            Ok(Request::ScrapeJob) => {
                let result = extractor.extract(&self.page);
                Some(serde_json::to_value(&result).unwrap_or_else(|err| {
                    serde_json::json!({ "error": err.to_string() })
                }))
            }
            Err(_) => {
                tracker_debug!("Ignoring message {}", message);
                None
            }
        }
    }
}
