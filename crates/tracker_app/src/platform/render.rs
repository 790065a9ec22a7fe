use std::fmt::Write;

use tracker_core::{DashboardView, JobRecord, JobStatus, PanelView};

const DESCRIPTION_PREVIEW_CHARS: usize = 160;
const NO_DESCRIPTION: &str = "No description available for this job.";

pub fn render_panel(view: &PanelView) -> String {
    let draft = &view.draft;
    let mut out = String::new();
    if let Some(message) = &view.message {
        let _ = writeln!(out, "{message}");
    }
    let _ = writeln!(out, "Title:       {}", draft.title);
    let _ = writeln!(out, "Company:     {}", draft.company);
    let _ = writeln!(out, "URL:         {}", draft.url);
    let _ = writeln!(out, "Status:      {}", draft.status);
    let _ = writeln!(out, "Date:        {}", draft.date);
    let _ = writeln!(out, "Description: {}", preview(&draft.description));
    out
}

pub fn render_saved(record: &JobRecord) -> String {
    format!("Saved {} ({})", record.id, record.title)
}

pub fn render_dashboard(view: &DashboardView, filter: Option<JobStatus>) -> String {
    let counts = view.counts;
    let mut out = format!(
        "Applied: {} | Interviewing: {} | Offers: {} | Wishlist: {} | Rejected: {}\n",
        counts.applied, counts.interviewing, counts.offers, counts.wishlist, counts.rejected
    );

    let rows: Vec<&JobRecord> = view
        .records
        .iter()
        .filter(|record| filter.map_or(true, |status| record.status == status))
        .collect();
    if rows.is_empty() {
        match filter {
            Some(status) => {
                let _ = writeln!(out, "No jobs with status {status}.");
            }
            None => out.push_str("No jobs tracked yet.\n"),
        }
        return out;
    }
    for record in rows {
        let _ = write!(
            out,
            "{}  {:<12}  {:<10}  {}",
            record.id,
            record.status,
            date_text(record),
            record.title
        );
        if !record.company.is_empty() {
            let _ = write!(out, " @ {}", record.company);
        }
        out.push('\n');
    }
    out
}

/// Full view of one job, description unshortened.
pub fn render_details(view: &DashboardView) -> Option<String> {
    let record = view.selected.as_ref()?;
    let mut out = format!("{}\n", record.title);
    let _ = writeln!(out, "Company: {}", record.company);
    let _ = writeln!(out, "Date:    {}", date_text(record));
    let _ = writeln!(out, "Status:  {}", record.status);
    out.push('\n');
    if record.description.trim().is_empty() {
        let _ = writeln!(out, "{NO_DESCRIPTION}");
    } else {
        let _ = writeln!(out, "{}", record.description.trim_end());
    }
    out.push('\n');
    let _ = writeln!(out, "Job post: {}", record.url);
    Some(out)
}

pub fn render_pending_delete(view: &DashboardView) -> Option<String> {
    view.pending_delete.as_ref().map(|record| {
        format!(
            "Delete \"{}\" ({})? Run again with --yes to confirm.",
            record.title, record.id
        )
    })
}

fn date_text(record: &JobRecord) -> String {
    record.date.map(|date| date.to_string()).unwrap_or_default()
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use tracker_core::{JobDraft, StatusCounts};
    use uuid::Uuid;

    #[test]
    fn dashboard_lists_filtered_rows_with_counts() {
        let mut draft = JobDraft::new(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
        draft.title = "Engineer".into();
        draft.company = "Acme".into();
        draft.url = "https://example.com".into();
        let record = draft.into_record(Uuid::nil(), Utc::now()).unwrap();
        let view = DashboardView {
            counts: StatusCounts::tally(std::slice::from_ref(&record)),
            records: vec![record],
            selected: None,
            pending_delete: None,
        };

        let text = render_dashboard(&view, None);
        assert!(text.starts_with("Applied: 1 | Interviewing: 0"));
        assert!(text.contains("2025-01-09  Engineer @ Acme"));

        let text = render_dashboard(&view, Some(JobStatus::Offer));
        assert!(text.ends_with("No jobs with status Offer.\n"));
    }

    fn selected(record: JobRecord) -> DashboardView {
        DashboardView {
            counts: StatusCounts::tally(std::slice::from_ref(&record)),
            records: vec![record.clone()],
            selected: Some(record),
            pending_delete: None,
        }
    }

    #[test]
    fn details_show_full_description_and_post_link() {
        let mut draft = JobDraft::new(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        draft.title = "Platform Engineer".into();
        draft.company = "Acme".into();
        draft.url = "https://example.com/jobs/7".into();
        draft.description = format!("Intro\n{}", "detail ".repeat(60));
        let record = draft.into_record(Uuid::nil(), Utc::now()).unwrap();

        let text = render_details(&selected(record)).unwrap();
        assert!(text.starts_with("Platform Engineer\nCompany: Acme\nDate:    2025-03-04\n"));
        assert!(text.contains(&"detail ".repeat(60).trim_end().to_string()));
        assert!(text.ends_with("Job post: https://example.com/jobs/7\n"));
        assert_eq!(render_details(&DashboardView::default()), None);
    }

    #[test]
    fn details_without_description_or_date_use_fallbacks() {
        let mut draft = JobDraft::new(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        draft.title = "Bare".into();
        draft.url = "https://example.com/bare".into();
        let mut record = draft.into_record(Uuid::nil(), Utc::now()).unwrap();
        record.date = None;

        let text = render_details(&selected(record)).unwrap();
        assert!(text.contains("No description available for this job.\n"));
        assert!(text.contains("Date:    \n"));
    }

    #[test]
    fn long_descriptions_are_shortened() {
        let long = "word ".repeat(100);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), DESCRIPTION_PREVIEW_CHARS + 1);
        assert!(shown.ends_with('…'));
    }
}
