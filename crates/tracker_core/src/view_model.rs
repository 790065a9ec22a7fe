use crate::{JobDraft, JobRecord, JobStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub draft: JobDraft,
    pub loading: bool,
    pub message: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub wishlist: usize,
    pub applied: usize,
    pub interviewing: usize,
    pub offers: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally(records: &[JobRecord]) -> Self {
        records.iter().fold(Self::default(), |mut counts, record| {
            match record.status {
                JobStatus::Wishlist => counts.wishlist += 1,
                JobStatus::Applied => counts.applied += 1,
                JobStatus::Interviewing => counts.interviewing += 1,
                JobStatus::Offer => counts.offers += 1,
                JobStatus::Rejected => counts.rejected += 1,
            }
            counts
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardView {
    pub records: Vec<JobRecord>,
    pub counts: StatusCounts,
    /// Job whose details are open.
    pub selected: Option<JobRecord>,
    pub pending_delete: Option<JobRecord>,
}
