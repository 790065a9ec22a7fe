use chrono::{DateTime, NaiveDate, Utc};

use crate::extraction::present;
use crate::{ExtractionResult, JobId, JobRecord, JobStatus};

/// Editable form state that becomes a [`JobRecord`] on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub url: String,
    pub description: String,
    pub status: JobStatus,
    pub date: NaiveDate,
}

/// A single user edit to the draft form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Title(String),
    Company(String),
    Url(String),
    Description(String),
    Status(JobStatus),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Job title is required.")]
    MissingTitle,
    #[error("Job URL is required.")]
    MissingUrl,
}

impl JobDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            url: String::new(),
            description: String::new(),
            status: JobStatus::default(),
            date: today,
        }
    }

    pub fn edit(&mut self, field: DraftField) {
        match field {
            DraftField::Title(v) => self.title = v,
            DraftField::Company(v) => self.company = v,
            DraftField::Url(v) => self.url = v,
            DraftField::Description(v) => self.description = v,
            DraftField::Status(v) => self.status = v,
            DraftField::Date(v) => self.date = v,
        }
    }

    /// Seeds the draft from a scan.
    ///
    /// Title and url keep their previous value when the scan has none. Company
    /// falls back to the text after the first `" - "` in the scanned title.
    /// Description is always replaced.
    pub fn apply_extraction(&mut self, result: &ExtractionResult) {
        if let Some(title) = present(&result.title) {
            self.title = title.to_string();
        }
        if let Some(url) = present(&result.url) {
            self.url = url.to_string();
        }
        self.company = match present(&result.company) {
            Some(company) => company.to_string(),
            None => present(&result.title)
                .and_then(|title| title.split(" - ").nth(1))
                .unwrap_or_default()
                .to_string(),
        };
        self.description = present(&result.description)
            .unwrap_or_default()
            .to_string();
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.url.trim().is_empty() {
            return Err(DraftError::MissingUrl);
        }
        Ok(())
    }

    /// Validates the draft and stamps it with identity and creation time.
    pub fn into_record(self, id: JobId, created_at: DateTime<Utc>) -> Result<JobRecord, DraftError> {
        self.validate()?;
        Ok(JobRecord {
            id,
            title: self.title,
            company: self.company,
            url: self.url,
            description: self.description,
            status: self.status,
            date: Some(self.date),
            created_at,
        })
    }
}
