//! Tracker core: record model, draft handling and the pure panel/dashboard state machines.
mod dashboard;
mod draft;
mod effect;
mod extraction;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use dashboard::{update_dashboard, DashboardEffect, DashboardMsg, DashboardState};
pub use draft::{DraftError, DraftField, JobDraft};
pub use effect::Effect;
pub use extraction::ExtractionResult;
pub use msg::{Msg, ScanFailure};
pub use record::{JobId, JobRecord, JobStatus, ParseStatusError};
pub use state::PanelState;
pub use update::update;
pub use view_model::{DashboardView, PanelView, StatusCounts};
