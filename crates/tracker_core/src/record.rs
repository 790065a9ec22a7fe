use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type JobId = Uuid;

/// Application status of a tracked job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JobStatus {
    Wishlist,
    #[default]
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Wishlist,
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Offer,
        JobStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Wishlist => "Wishlist",
            JobStatus::Applied => "Applied",
            JobStatus::Interviewing => "Interviewing",
            JobStatus::Offer => "Offer",
            JobStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status {0:?} (expected one of Wishlist, Applied, Interviewing, Offer, Rejected)")]
pub struct ParseStatusError(pub String);

impl FromStr for JobStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// A persisted job application entry.
///
/// Records are only created from a validated [`crate::JobDraft`]; afterwards
/// only `status` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub company: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: JobStatus,
    /// Application date; `None` when the form was submitted with it blank.
    #[serde(default, with = "blank_date")]
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Dates are stored as `YYYY-MM-DD`; a blank date is stored as `""`.
mod blank_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.collect_str(date),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => text.parse().map(Some).map_err(de::Error::custom),
        }
    }
}
