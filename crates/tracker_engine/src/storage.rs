//! Key/value storage area with change notifications.
//!
//! Every `set` replaces a key's whole value. After the backend accepted the
//! write, each listener registered on the area receives one [`StorageChange`].
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracker_logging::{tracker_debug, tracker_info};

use crate::{AtomicFileWriter, PersistError};

pub const LOCAL_AREA: &str = "local";

const STORAGE_FILENAME: &str = "storage.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage write rejected: {0}")]
    WriteRejected(String),
    #[error("storage data is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// New value of one key after a write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// Notification delivered to listeners: `{ area, changes: { key: { newValue } } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageChange {
    pub area: String,
    pub changes: BTreeMap<String, ValueChange>,
}

/// Where an area's items live between runs.
pub trait StorageBackend: Send {
    fn load(&mut self) -> Result<Map<String, Value>, StorageError>;
    fn save(&mut self, items: &Map<String, Value>) -> Result<(), StorageError>;
}

/// Volatile backend; can be told to reject writes.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: Map<String, Value>,
    reject_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_writes() -> Self {
        Self {
            reject_writes: true,
            ..Self::default()
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&mut self) -> Result<Map<String, Value>, StorageError> {
        Ok(self.items.clone())
    }

    fn save(&mut self, items: &Map<String, Value>) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::WriteRejected("backend is read-only".into()));
        }
        self.items = items.clone();
        Ok(())
    }
}

/// Keeps the whole area as one JSON object in `{dir}/storage.json`.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    writer: AtomicFileWriter,
}

impl JsonFileBackend {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(STORAGE_FILENAME)
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&mut self) -> Result<Map<String, Value>, StorageError> {
        match self.writer.read(STORAGE_FILENAME)? {
            Some(text) if !text.trim().is_empty() => Ok(serde_json::from_str(&text)?),
            _ => Ok(Map::new()),
        }
    }

    fn save(&mut self, items: &Map<String, Value>) -> Result<(), StorageError> {
        let content = serde_json::to_vec_pretty(items)?;
        self.writer.write(STORAGE_FILENAME, &content)?;
        Ok(())
    }
}

type Listener = Arc<dyn Fn(&StorageChange) + Send + Sync>;

struct AreaState {
    items: Map<String, Value>,
    backend: Box<dyn StorageBackend>,
}

struct Inner {
    area: String,
    state: Mutex<AreaState>,
    listeners: Mutex<BTreeMap<u64, Listener>>,
    next_listener: AtomicU64,
}

/// Shared handle to one storage area. Clones see the same items and listeners.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<Inner>,
}

impl Storage {
    /// Opens the `local` area, reading whatever the backend already holds.
    pub fn open(backend: impl StorageBackend + 'static) -> Result<Self, StorageError> {
        Self::open_area(LOCAL_AREA, backend)
    }

    pub fn open_area(
        area: impl Into<String>,
        mut backend: impl StorageBackend + 'static,
    ) -> Result<Self, StorageError> {
        let area = area.into();
        let items = backend.load()?;
        tracker_info!("Opened storage area {:?} with {} key(s)", area, items.len());
        Ok(Self::from_parts(area, items, Box::new(backend)))
    }

    /// In-memory `local` area, empty.
    pub fn in_memory() -> Self {
        Self::from_parts(LOCAL_AREA.to_string(), Map::new(), Box::new(MemoryBackend::new()))
    }

    fn from_parts(
        area: String,
        items: Map<String, Value>,
        backend: Box<dyn StorageBackend>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                area,
                state: Mutex::new(AreaState {
                    items,
                    backend,
                }),
                listeners: Mutex::new(BTreeMap::new()),
                next_listener: AtomicU64::new(1),
            }),
        }
    }

    pub fn area(&self) -> &str {
        &self.inner.area
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        lock(&self.inner.state).items.get(key).cloned()
    }

    /// Replaces `key`'s value and notifies listeners once the backend accepted it.
    pub fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let change = {
            let mut state = lock(&self.inner.state);
            let mut next = state.items.clone();
            let old_value = next.insert(key.to_string(), value.clone());
            state.backend.save(&next)?;
            state.items = next;
            StorageChange {
                area: self.inner.area.clone(),
                changes: BTreeMap::from([(
                    key.to_string(),
                    ValueChange {
                        old_value,
                        new_value: Some(value),
                    },
                )]),
            }
        };
        self.notify(&change);
        Ok(())
    }

    /// Registers a listener for every change in this area.
    pub fn on_changed(
        &self,
        listener: impl Fn(&StorageChange) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.listeners).insert(id, Arc::new(listener));
        tracker_debug!("Listener {} registered on {:?}", id, self.inner.area);
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }

    fn notify(&self, change: &StorageChange) {
        // Listeners run without the lock held so they may read or write the area.
        let listeners: Vec<Listener> = lock(&self.inner.listeners).values().cloned().collect();
        for listener in listeners {
            listener(change);
        }
    }
}

/// Handle of a registered listener; dropping it unregisters the listener.
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The storage may already be gone; then there is nothing to remove.
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner.listeners).remove(&self.id);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
