use serde_json::Value;
use tracker_core::{JobId, JobRecord, JobStatus};
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::{Storage, StorageError, Subscription};

/// Storage key holding the whole job collection.
pub const JOBS_KEY: &str = "jobs";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stored jobs are unreadable: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("a job with id {0} already exists")]
    DuplicateId(JobId),
}

/// The persisted job collection, newest first.
///
/// Each mutation reads the current collection, computes the next one and
/// writes it back whole. Two handles over the same [`Storage`] race as
/// last-write-wins.
#[derive(Clone)]
pub struct RecordStore {
    storage: Storage,
}

impl RecordStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn load(&self) -> Result<Vec<JobRecord>, StoreError> {
        decode(self.storage.get(JOBS_KEY))
    }

    /// Prepends `record` and persists the collection.
    pub fn append(&self, record: JobRecord) -> Result<(), StoreError> {
        let mut jobs = self.load()?;
        if jobs.iter().any(|job| job.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        tracker_info!("Saving job {} ({:?})", record.id, record.title);
        jobs.insert(0, record);
        self.write(&jobs)
    }

    /// Sets the status of the job with `id`. Returns `false`, without writing,
    /// when no such job exists.
    pub fn update_status(&self, id: JobId, status: JobStatus) -> Result<bool, StoreError> {
        let mut jobs = self.load()?;
        let Some(job) = jobs.iter_mut().find(|job| job.id == id) else {
            tracker_debug!("Status change for unknown job {}", id);
            return Ok(false);
        };
        tracker_info!("Job {} status {} -> {}", id, job.status, status);
        job.status = status;
        self.write(&jobs)?;
        Ok(true)
    }

    /// Deletes the job with `id`. Returns `false`, without writing, when no
    /// such job exists.
    pub fn remove(&self, id: JobId) -> Result<bool, StoreError> {
        let mut jobs = self.load()?;
        let before = jobs.len();
        jobs.retain(|job| job.id != id);
        if jobs.len() == before {
            tracker_debug!("Delete for unknown job {}", id);
            return Ok(false);
        }
        tracker_info!("Deleted job {}", id);
        self.write(&jobs)?;
        Ok(true)
    }

    /// Calls `observer` with the full collection after every write to it,
    /// whichever handle made the write.
    pub fn subscribe(
        &self,
        observer: impl Fn(&[JobRecord]) + Send + Sync + 'static,
    ) -> Subscription {
        let area = self.storage.area().to_string();
        self.storage.on_changed(move |change| {
            if change.area != area {
                return;
            }
            let Some(jobs) = change.changes.get(JOBS_KEY) else {
                return;
            };
            match decode(jobs.new_value.clone()) {
                Ok(records) => observer(&records),
                Err(err) => tracker_warn!("Ignoring unreadable jobs update: {}", err),
            }
        })
    }

    fn write(&self, jobs: &[JobRecord]) -> Result<(), StoreError> {
        let value = serde_json::to_value(jobs)?;
        self.storage.set(JOBS_KEY, value)?;
        Ok(())
    }
}

fn decode(value: Option<Value>) -> Result<Vec<JobRecord>, StoreError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}
