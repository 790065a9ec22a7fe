use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracker_logging::tracker_debug;

use crate::{JobExtractor, PageContext, PageSnapshot, RelayError, TabId, TabMessenger};

struct Tab {
    context: PageContext,
    restricted: bool,
    injections: usize,
}

#[derive(Default)]
struct BrowserState {
    tabs: BTreeMap<TabId, Tab>,
    active: Option<TabId>,
    next_id: TabId,
}

/// In-process browser window: tabs hold loaded pages, messages are routed to
/// whatever extractor each page context has registered.
#[derive(Default)]
pub struct LocalBrowser {
    state: Mutex<BrowserState>,
}

impl LocalBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, BrowserState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens `page` in a new tab and makes it active.
    ///
    /// With `attach_on_load` the extractor registers as the page loads, the way
    /// a declared content script would.
    pub fn open_tab(&self, page: PageSnapshot, attach_on_load: bool) -> TabId {
        let mut state = self.state();
        state.next_id += 1;
        let id = state.next_id;
        let mut context = PageContext::new(page);
        if attach_on_load {
            context.attach(JobExtractor);
        }
        state.tabs.insert(
            id,
            Tab {
                context,
                restricted: false,
                injections: 0,
            },
        );
        state.active = Some(id);
        id
    }

    pub fn close_tab(&self, tab: TabId) {
        let mut state = self.state();
        state.tabs.remove(&tab);
        if state.active == Some(tab) {
            state.active = state.tabs.keys().next_back().copied();
        }
    }

    /// Marks a tab as a page extensions may not script (browser settings, stores).
    pub fn set_restricted(&self, tab: TabId, restricted: bool) {
        if let Some(entry) = self.state().tabs.get_mut(&tab) {
            entry.restricted = restricted;
        }
    }

    /// Number of times code was injected into `tab`.
    pub fn injections(&self, tab: TabId) -> usize {
        self.state().tabs.get(&tab).map_or(0, |t| t.injections)
    }
}

#[async_trait::async_trait]
impl TabMessenger for LocalBrowser {
    async fn active_tab(&self) -> Option<TabId> {
        self.state().active
    }

    async fn send_message(&self, tab: TabId, message: Value) -> Result<Value, RelayError> {
        let state = self.state();
        let entry = state.tabs.get(&tab).ok_or(RelayError::NoSuchTab(tab))?;
        entry
            .context
            .deliver(&message)
            .ok_or(RelayError::NoReceiver)
    }

    async fn inject_extractor(&self, tab: TabId) -> Result<(), RelayError> {
        let mut state = self.state();
        let entry = state.tabs.get_mut(&tab).ok_or(RelayError::NoSuchTab(tab))?;
        if entry.restricted {
            return Err(RelayError::Restricted(tab));
        }
        entry.injections += 1;
        let fresh = entry.context.attach(JobExtractor);
        tracker_debug!("Injected into tab {} (fresh listener: {})", tab, fresh);
        Ok(())
    }
}
