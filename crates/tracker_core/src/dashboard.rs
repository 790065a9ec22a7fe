//! Dashboard surface: a transient copy of the collection, the job whose
//! details are open and the pending delete.
use crate::view_model::{DashboardView, StatusCounts};
use crate::{JobId, JobRecord, JobStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardState {
    records: Vec<JobRecord>,
    selected: Option<JobId>,
    pending_delete: Option<JobId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardMsg {
    /// The store delivered a new full collection.
    RecordsChanged(Vec<JobRecord>),
    StatusSelected { id: JobId, status: JobStatus },
    /// Opens the details of one job.
    JobSelected(JobId),
    DetailsClosed,
    DeleteRequested(JobId),
    DeleteConfirmed,
    DeleteCancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEffect {
    UpdateStatus { id: JobId, status: JobStatus },
    RemoveRecord(JobId),
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            records: self.records.clone(),
            counts: StatusCounts::tally(&self.records),
            selected: self.find(self.selected),
            pending_delete: self.find(self.pending_delete),
        }
    }

    fn find(&self, id: Option<JobId>) -> Option<JobRecord> {
        id.and_then(|id| self.records.iter().find(|r| r.id == id).cloned())
    }

    fn contains(&self, id: JobId) -> bool {
        self.records.iter().any(|r| r.id == id)
    }
}

/// Applies a dashboard message. Local state changes optimistically; the
/// returned effects carry the write the store must perform.
pub fn update_dashboard(
    mut state: DashboardState,
    msg: DashboardMsg,
) -> (DashboardState, Vec<DashboardEffect>) {
    let effects = match msg {
        DashboardMsg::RecordsChanged(records) => {
            state.records = records;
            // Another surface may have deleted the job meanwhile.
            if state.pending_delete.is_some_and(|id| !state.contains(id)) {
                state.pending_delete = None;
            }
            if state.selected.is_some_and(|id| !state.contains(id)) {
                state.selected = None;
            }
            Vec::new()
        }
        DashboardMsg::StatusSelected { id, status } => {
            match state.records.iter_mut().find(|r| r.id == id) {
                Some(record) if record.status != status => {
                    record.status = status;
                    vec![DashboardEffect::UpdateStatus { id, status }]
                }
                _ => Vec::new(),
            }
        }
        DashboardMsg::JobSelected(id) => {
            if state.contains(id) {
                state.selected = Some(id);
            }
            Vec::new()
        }
        DashboardMsg::DetailsClosed => {
            state.selected = None;
            Vec::new()
        }
        DashboardMsg::DeleteRequested(id) => {
            if state.contains(id) {
                state.pending_delete = Some(id);
            }
            Vec::new()
        }
        DashboardMsg::DeleteConfirmed => match state.pending_delete.take() {
            Some(id) => {
                state.records.retain(|r| r.id != id);
                if state.selected == Some(id) {
                    state.selected = None;
                }
                vec![DashboardEffect::RemoveRecord(id)]
            }
            None => Vec::new(),
        },
        DashboardMsg::DeleteCancelled => {
            state.pending_delete = None;
            Vec::new()
        }
    };

    (state, effects)
}
