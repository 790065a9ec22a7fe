use std::collections::VecDeque;

use chrono::Utc;
use tracker_core::{update, Effect, JobRecord, Msg, PanelState};
use tracker_engine::{Dispatcher, RecordStore, TabMessenger};
use tracker_logging::{tracker_error, tracker_info, tracker_warn};
use uuid::Uuid;

/// Runs the capture panel: feeds messages through `update` and executes the
/// effects it asks for, turning each outcome back into a message.
pub struct EffectRunner<M> {
    dispatcher: Dispatcher<M>,
    store: RecordStore,
    saved: Vec<JobRecord>,
}

impl<M: TabMessenger> EffectRunner<M> {
    pub fn new(dispatcher: Dispatcher<M>, store: RecordStore) -> Self {
        Self {
            dispatcher,
            store,
            saved: Vec::new(),
        }
    }

    /// Records appended by this runner, in save order.
    pub fn saved(&self) -> &[JobRecord] {
        &self.saved
    }

    pub async fn dispatch(&mut self, state: PanelState, msg: Msg) -> PanelState {
        let mut inbox = VecDeque::from([msg]);
        let mut state = state;
        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            for effect in effects {
                inbox.push_back(self.run(effect).await);
            }
        }
        state
    }

    async fn run(&mut self, effect: Effect) -> Msg {
        match effect {
            Effect::ScrapeActiveTab => {
                let result = self.dispatcher.scrape_active_tab().await;
                if let Err(err) = &result {
                    tracker_warn!("Scan failed: {}", err);
                }
                Msg::ScanFinished(result.map_err(|err| err.into_scan_failure()))
            }
            Effect::PersistDraft(draft) => {
                let record = match draft.into_record(Uuid::new_v4(), Utc::now()) {
                    Ok(record) => record,
                    Err(err) => return Msg::SaveFinished(Err(err.to_string())),
                };
                match self.store.append(record.clone()) {
                    Ok(()) => {
                        tracker_info!("Saved job {} from {}", record.id, record.url);
                        self.saved.push(record);
                        Msg::SaveFinished(Ok(()))
                    }
                    Err(err) => {
                        tracker_error!("Save error: {}", err);
                        Msg::SaveFinished(Err(err.to_string()))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tracker_core::{DraftField, JobStatus};
    use tracker_engine::{
        DispatchSettings, LocalBrowser, MemoryBackend, PageSnapshot, Storage,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    fn runner(browser: LocalBrowser, storage: Storage) -> EffectRunner<LocalBrowser> {
        let dispatcher = Dispatcher::new(browser, DispatchSettings::default());
        EffectRunner::new(dispatcher, RecordStore::new(storage))
    }

    #[tokio::test(start_paused = true)]
    async fn scan_then_save_appends_record() {
        let browser = LocalBrowser::new();
        let page = PageSnapshot::new(
            "https://www.linkedin.com/jobs/view/99/",
            r#"<html><body><h1>Compiler Engineer - Ferrous Systems</h1></body></html>"#,
        )
        .unwrap();
        browser.open_tab(page, false);
        let storage = Storage::in_memory();
        let mut runner = runner(browser, storage.clone());

        let state = runner.dispatch(PanelState::new(today()), Msg::ScanClicked).await;
        assert_eq!(state.view().message.as_deref(), Some("Page scanned successfully!"));
        assert_eq!(state.draft().company, "Ferrous Systems");

        let state = runner
            .dispatch(state, Msg::FieldEdited(DraftField::Status(JobStatus::Interviewing)))
            .await;
        let state = runner.dispatch(state, Msg::SaveClicked).await;

        assert_eq!(state.view().message.as_deref(), Some("Job saved successfully!"));
        let jobs = RecordStore::new(storage).load().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Compiler Engineer - Ferrous Systems");
        assert_eq!(jobs[0].status, JobStatus::Interviewing);
        assert_eq!(jobs[0].url, "https://www.linkedin.com/jobs/view/99/");
        assert_eq!(runner.saved(), jobs.as_slice());
    }

    #[tokio::test(start_paused = true)]
    async fn scan_without_tab_reports_generic_failure() {
        let mut runner = runner(LocalBrowser::new(), Storage::in_memory());
        let state = runner.dispatch(PanelState::new(today()), Msg::ScanClicked).await;

        assert!(!state.is_loading());
        assert_eq!(
            state.view().message.as_deref(),
            Some("Error scanning page. Please refresh the job page and try again.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn storage_failure_surfaces_as_failed_save() {
        let storage = Storage::open(MemoryBackend::rejecting_writes()).unwrap();
        let mut runner = runner(LocalBrowser::new(), storage);
        let mut state = PanelState::new(today());
        for edit in [
            DraftField::Title("Kept".into()),
            DraftField::Url("https://example.com/kept".into()),
        ] {
            state = runner.dispatch(state, Msg::FieldEdited(edit)).await;
        }

        let state = runner.dispatch(state, Msg::SaveClicked).await;
        assert_eq!(state.view().message.as_deref(), Some("Failed to save job."));
        assert_eq!(state.draft().title, "Kept");
        assert!(runner.saved().is_empty());
    }
}
