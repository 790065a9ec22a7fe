use std::sync::mpsc;

use tracker_core::{update_dashboard, DashboardEffect, DashboardMsg, DashboardState};
use tracker_engine::{RecordStore, StoreError, Subscription};
use tracker_logging::{tracker_debug, tracker_warn};

/// Dashboard surface: keeps its copy of the collection in sync through a
/// store subscription and writes user actions back to the store.
pub struct DashboardSurface {
    store: RecordStore,
    state: DashboardState,
    msg_rx: mpsc::Receiver<DashboardMsg>,
    _subscription: Subscription,
}

impl DashboardSurface {
    pub fn open(store: RecordStore) -> Result<Self, StoreError> {
        let (msg_tx, msg_rx) = mpsc::channel();
        // A closed surface drops the receiver; late notifications are discarded.
        let subscription = store.subscribe(move |records| {
            let _ = msg_tx.send(DashboardMsg::RecordsChanged(records.to_vec()));
        });
        let initial = store.load()?;
        let (state, _) = update_dashboard(DashboardState::new(), DashboardMsg::RecordsChanged(initial));
        Ok(Self {
            store,
            state,
            msg_rx,
            _subscription: subscription,
        })
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Applies a user message, performs the resulting writes, then takes in
    /// whatever the store broadcast in response.
    pub fn dispatch(&mut self, msg: DashboardMsg) -> Result<(), StoreError> {
        let result = self.apply(msg);
        if result.is_err() {
            // The optimistic local change never reached storage.
            let records = self.store.load()?;
            self.state = update_dashboard(DashboardState::new(), DashboardMsg::RecordsChanged(records)).0;
        }
        self.process_pending_messages();
        result
    }

    fn apply(&mut self, msg: DashboardMsg) -> Result<(), StoreError> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update_dashboard(state, msg);
        self.state = state;
        for effect in effects {
            match effect {
                DashboardEffect::UpdateStatus { id, status } => {
                    self.store.update_status(id, status)?;
                }
                DashboardEffect::RemoveRecord(id) => {
                    self.store.remove(id)?;
                }
            }
        }
        Ok(())
    }

    fn process_pending_messages(&mut self) {
        let inbox: Vec<DashboardMsg> = self.msg_rx.try_iter().collect();
        tracker_debug!("Dashboard received {} update(s)", inbox.len());
        for msg in inbox {
            if let Err(err) = self.apply(msg) {
                tracker_warn!("Dashboard update failed: {}", err);
            }
        }
    }
}
