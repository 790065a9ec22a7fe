use chrono::NaiveDate;

use crate::view_model::PanelView;
use crate::JobDraft;

/// Capture-form state of the side panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    today: NaiveDate,
    draft: JobDraft,
    loading: bool,
    message: Option<String>,
    dirty: bool,
}

impl PanelState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            draft: JobDraft::new(today),
            loading: false,
            message: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> PanelView {
        PanelView {
            draft: self.draft.clone(),
            loading: self.loading,
            message: self.message.clone(),
            dirty: self.dirty,
        }
    }

    pub fn draft(&self) -> &JobDraft {
        &self.draft
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn draft_mut(&mut self) -> &mut JobDraft {
        self.dirty = true;
        &mut self.draft
    }

    pub(crate) fn reset_draft(&mut self) {
        self.draft = JobDraft::new(self.today);
        self.dirty = true;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.dirty = true;
    }

    pub(crate) fn set_message(&mut self, message: Option<String>) {
        self.message = message;
        self.dirty = true;
    }
}
