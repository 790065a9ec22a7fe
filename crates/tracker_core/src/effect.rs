use crate::JobDraft;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the dispatcher to scrape the active tab.
    ScrapeActiveTab,
    /// Turn the validated draft into a record and append it to the store.
    PersistDraft(JobDraft),
}
