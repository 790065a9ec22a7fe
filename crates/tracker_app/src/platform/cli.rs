use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracker_core::{DraftField, JobStatus};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "job_tracker", version, about = "Capture job postings and track applications")]
pub struct Cli {
    /// RON config file (defaults to ./tracker.ron when present).
    #[arg(long, env = "JOB_TRACKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides the config's data directory.
    #[arg(long, env = "JOB_TRACKER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a saved HTML page as if it were the active tab.
    Scan(ScanArgs),
    /// Save a job entered by hand.
    Add(AddArgs),
    /// Show saved jobs and status counts.
    List {
        #[arg(long)]
        status: Option<JobStatus>,
    },
    /// Show one job in full: description and link to the posting.
    Show { id: Uuid },
    /// Change a job's status.
    Status { id: Uuid, status: JobStatus },
    /// Delete a job.
    Remove {
        id: Uuid,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

/// Form fields shared by `scan` and `add`; given values override scanned ones.
#[derive(Debug, Args)]
pub struct FormArgs {
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<JobStatus>,
    /// Application date, YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// HTML file holding the page's DOM.
    #[arg(long)]
    pub page: PathBuf,
    /// Address the page was loaded from.
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub title: Option<String>,
    /// Save the scanned job.
    #[arg(long)]
    pub save: bool,
    #[command(flatten)]
    pub form: FormArgs,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub url: String,
    #[command(flatten)]
    pub form: FormArgs,
}

impl FormArgs {
    pub fn edits(&self) -> Vec<DraftField> {
        let mut edits = Vec::new();
        if let Some(company) = &self.company {
            edits.push(DraftField::Company(company.clone()));
        }
        if let Some(description) = &self.description {
            edits.push(DraftField::Description(description.clone()));
        }
        if let Some(status) = self.status {
            edits.push(DraftField::Status(status));
        }
        if let Some(date) = self.date {
            edits.push(DraftField::Date(date));
        }
        edits
    }
}
