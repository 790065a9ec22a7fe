use serde::{Deserialize, Serialize};

pub const SCRAPE_JOB: &str = "SCRAPE_JOB";

/// Message sent from the dispatcher to a page's content script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "SCRAPE_JOB")]
    ScrapeJob,
}

impl Request {
    pub fn to_message(self) -> serde_json::Value {
        // A unit variant with an internal tag always serializes to an object.
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({ "action": SCRAPE_JOB }))
    }
}
