use std::time::Duration;

use serde_json::Value;
use tracker_core::{ExtractionResult, ScanFailure};
use tracker_logging::{tracker_info, tracker_warn};

use crate::Request;

pub type TabId = u32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("Could not establish connection. Receiving end does not exist.")]
    NoReceiver,
    #[error("No tab with id {0}.")]
    NoSuchTab(TabId),
    #[error("Cannot access contents of tab {0}.")]
    Restricted(TabId),
    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("No active tab found")]
    NoActiveTab,
    #[error("Could not load the extractor into tab {tab}: {source}")]
    Inject { tab: TabId, source: RelayError },
    #[error("Tab {tab} did not answer after reloading the extractor: {source}")]
    Relay { tab: TabId, source: RelayError },
    #[error("{0}")]
    Extraction(String),
}

impl DispatchError {
    /// Maps the failure onto what the capture panel distinguishes.
    pub fn into_scan_failure(self) -> ScanFailure {
        match self {
            DispatchError::Extraction(message) => ScanFailure::Extraction(message),
            other => ScanFailure::Unavailable(other.to_string()),
        }
    }
}

/// Browser-side messaging to tabs.
#[async_trait::async_trait]
pub trait TabMessenger: Send + Sync {
    /// Active tab in the current window, if any.
    async fn active_tab(&self) -> Option<TabId>;

    /// Sends a runtime message to the tab's page context and awaits the answer.
    async fn send_message(&self, tab: TabId, message: Value) -> Result<Value, RelayError>;

    /// Loads the extractor's code into the tab's page context.
    async fn inject_extractor(&self, tab: TabId) -> Result<(), RelayError>;
}

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Pause between the remedial attach and the retry.
    pub grace: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            grace: Duration::from_millis(500),
        }
    }
}

/// Relays scrape requests to the active tab.
pub struct Dispatcher<M> {
    messenger: M,
    settings: DispatchSettings,
}

impl<M: TabMessenger> Dispatcher<M> {
    pub fn new(messenger: M, settings: DispatchSettings) -> Self {
        Self {
            messenger,
            settings,
        }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// Scrapes the active tab.
    ///
    /// If the page has no receiver, the extractor is injected once and the
    /// request is retried once after the grace interval.
    pub async fn scrape_active_tab(&self) -> Result<ExtractionResult, DispatchError> {
        let tab = self
            .messenger
            .active_tab()
            .await
            .ok_or(DispatchError::NoActiveTab)?;

        let response = match self.request(tab).await {
            Ok(response) => response,
            Err(first) => {
                tracker_info!("Tab {} not ready ({}), injecting extractor", tab, first);
                self.messenger
                    .inject_extractor(tab)
                    .await
                    .map_err(|source| DispatchError::Inject { tab, source })?;
                tokio::time::sleep(self.settings.grace).await;
                self.request(tab).await.map_err(|source| {
                    tracker_warn!("Tab {} still not answering: {}", tab, source);
                    DispatchError::Relay { tab, source }
                })?
            }
        };

        match response.error {
            Some(error) => Err(DispatchError::Extraction(error)),
            None => Ok(response),
        }
    }

    async fn request(&self, tab: TabId) -> Result<ExtractionResult, RelayError> {
        let reply = self
            .messenger
            .send_message(tab, Request::ScrapeJob.to_message())
            .await?;
        serde_json::from_value(reply).map_err(|err| RelayError::Malformed(err.to_string()))
    }
}
