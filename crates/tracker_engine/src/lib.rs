//! Tracker engine: page extraction, tab dispatch and the persisted record store.
mod browser;
mod content;
mod dispatch;
mod extract;
mod page;
mod persist;
mod protocol;
mod storage;
mod store;
mod text;

pub use browser::LocalBrowser;
pub use content::PageContext;
pub use dispatch::{
    DispatchError, DispatchSettings, Dispatcher, RelayError, TabId, TabMessenger,
};
pub use extract::{ExtractError, JobExtractor, SiteStrategy};
pub use page::{PageError, PageSnapshot};
pub use persist::{ensure_data_dir, AtomicFileWriter, PersistError};
pub use protocol::{Request, SCRAPE_JOB};
pub use storage::{
    JsonFileBackend, MemoryBackend, Storage, StorageBackend, StorageChange, StorageError,
    Subscription, ValueChange, LOCAL_AREA,
};
pub use store::{RecordStore, StoreError, JOBS_KEY};
pub use text::rendered_text;
