use crate::{Effect, Msg, PanelState, ScanFailure};

const SCAN_OK: &str = "Page scanned successfully!";
const SCAN_EMPTY: &str = "Could not scrape page.";
const SCAN_UNAVAILABLE: &str =
    "Error scanning page. Please refresh the job page and try again.";
const SAVE_OK: &str = "Job saved successfully!";
const SAVE_FAILED: &str = "Failed to save job.";

/// Pure update function: applies a message to the panel state and returns any effects.
pub fn update(mut state: PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    let effects = match msg {
        Msg::ScanClicked => {
            // One scan in flight at a time; the button is disabled while loading.
            if state.is_loading() {
                return (state, Vec::new());
            }
            state.set_loading(true);
            state.set_message(None);
            vec![Effect::ScrapeActiveTab]
        }
        Msg::ScanFinished(result) => {
            state.set_loading(false);
            let message = match result {
                Ok(extracted) => {
                    state.draft_mut().apply_extraction(&extracted);
                    SCAN_OK.to_string()
                }
                Err(ScanFailure::Extraction(error)) => {
                    let error = if error.trim().is_empty() {
                        SCAN_EMPTY.to_string()
                    } else {
                        error
                    };
                    format!("{error} Try refreshing the tab.")
                }
                Err(ScanFailure::Unavailable(_)) => SCAN_UNAVAILABLE.to_string(),
            };
            state.set_message(Some(message));
            Vec::new()
        }
        Msg::FieldEdited(field) => {
            state.draft_mut().edit(field);
            Vec::new()
        }
        Msg::SaveClicked => match state.draft().validate() {
            Ok(()) => vec![Effect::PersistDraft(state.draft().clone())],
            Err(err) => {
                state.set_message(Some(err.to_string()));
                Vec::new()
            }
        },
        Msg::SaveFinished(Ok(())) => {
            state.reset_draft();
            state.set_message(Some(SAVE_OK.to_string()));
            Vec::new()
        }
        Msg::SaveFinished(Err(_)) => {
            state.set_message(Some(SAVE_FAILED.to_string()));
            Vec::new()
        }
    };

    (state, effects)
}
