use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tracker_core::{JobDraft, JobRecord, JobStatus};
use tracker_engine::{
    JsonFileBackend, MemoryBackend, RecordStore, Storage, StorageChange, StoreError, JOBS_KEY,
};
use uuid::Uuid;

fn record(title: &str) -> JobRecord {
    let mut draft = JobDraft::new(NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
    draft.title = title.to_string();
    draft.company = format!("{title} Corp");
    draft.url = format!("https://jobs.example.com/{title}");
    draft.description = "Line one\nLine two".to_string();
    draft
        .into_record(Uuid::new_v4(), Utc.with_ymd_and_hms(2025, 2, 14, 8, 0, 0).unwrap())
        .unwrap()
}

type Seen = Arc<Mutex<Vec<Vec<JobRecord>>>>;

fn recorder(store: &RecordStore) -> (Seen, tracker_engine::Subscription) {
    let seen: Seen = Arc::default();
    let sink = seen.clone();
    let sub = store.subscribe(move |jobs| sink.lock().unwrap().push(jobs.to_vec()));
    (seen, sub)
}

fn titles(jobs: &[JobRecord]) -> Vec<&str> {
    jobs.iter().map(|job| job.title.as_str()).collect()
}

#[test]
fn empty_store_loads_empty_collection() {
    let store = RecordStore::new(Storage::in_memory());
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn append_prepends_newest_first() {
    let store = RecordStore::new(Storage::in_memory());
    store.append(record("A")).unwrap();
    store.append(record("B")).unwrap();

    assert_eq!(titles(&store.load().unwrap()), vec!["B", "A"]);
}

#[test]
fn appended_record_round_trips_intact() {
    let store = RecordStore::new(Storage::in_memory());
    let original = record("Roundtrip");
    store.append(original.clone()).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded, vec![original]);
}

#[test]
fn duplicate_id_is_rejected() {
    let store = RecordStore::new(Storage::in_memory());
    let original = record("A");
    store.append(original.clone()).unwrap();

    let err = store.append(original.clone()).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(id) if id == original.id));
    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn update_status_touches_only_matching_record() {
    let store = RecordStore::new(Storage::in_memory());
    let a = record("A");
    let x = record("X");
    store.append(a.clone()).unwrap();
    store.append(x.clone()).unwrap();

    assert!(store.update_status(x.id, JobStatus::Offer).unwrap());

    let jobs = store.load().unwrap();
    assert_eq!(jobs[0].status, JobStatus::Offer);
    assert_eq!(jobs[1], a);
    assert_eq!(
        JobRecord {
            status: JobStatus::Applied,
            ..jobs[0].clone()
        },
        x
    );
}

#[test]
fn missing_ids_are_noops_without_notification() {
    let store = RecordStore::new(Storage::in_memory());
    store.append(record("A")).unwrap();
    let before = store.load().unwrap();
    let (seen, _sub) = recorder(&store);

    assert!(!store.remove(Uuid::new_v4()).unwrap());
    assert!(!store.update_status(Uuid::new_v4(), JobStatus::Rejected).unwrap());

    assert_eq!(store.load().unwrap(), before);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn remove_deletes_matching_record() {
    let store = RecordStore::new(Storage::in_memory());
    let a = record("A");
    store.append(a.clone()).unwrap();
    store.append(record("B")).unwrap();

    assert!(store.remove(a.id).unwrap());
    assert_eq!(titles(&store.load().unwrap()), vec!["B"]);
}

#[test]
fn every_observer_gets_full_collection_once_per_write() {
    let storage = Storage::in_memory();
    let panel = RecordStore::new(storage.clone());
    let dashboard = RecordStore::new(storage);
    let (panel_seen, _p) = recorder(&panel);
    let (dashboard_seen, _d) = recorder(&dashboard);

    let a = record("A");
    panel.append(a.clone()).unwrap();
    panel.append(record("B")).unwrap();
    dashboard.update_status(a.id, JobStatus::Interviewing).unwrap();

    for seen in [&panel_seen, &dashboard_seen] {
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(titles(&seen[0]), vec!["A"]);
        assert_eq!(titles(&seen[1]), vec!["B", "A"]);
        assert_eq!(seen[2][1].status, JobStatus::Interviewing);
        assert_eq!(seen[2], panel.load().unwrap());
    }
}

#[test]
fn dropped_subscription_stops_notifications() {
    let store = RecordStore::new(Storage::in_memory());
    let (seen, sub) = recorder(&store);
    let (other_seen, other) = recorder(&store);

    store.append(record("A")).unwrap();
    drop(sub);
    store.append(record("B")).unwrap();
    other.unsubscribe();
    store.append(record("C")).unwrap();

    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(other_seen.lock().unwrap().len(), 2);
    assert_eq!(store.storage().listener_count(), 0);
}

#[test]
fn subscription_outliving_storage_drops_quietly() {
    let store = RecordStore::new(Storage::in_memory());
    let (_seen, sub) = recorder(&store);
    drop(store);
    drop(sub);
}

#[test]
fn observer_may_read_the_store() {
    let store = RecordStore::new(Storage::in_memory());
    let reader = store.clone();
    let counts = Arc::new(Mutex::new(Vec::new()));
    let sink = counts.clone();
    let _sub = store.subscribe(move |jobs| {
        let reloaded = reader.load().unwrap();
        sink.lock().unwrap().push((jobs.len(), reloaded.len()));
    });

    store.append(record("A")).unwrap();
    assert_eq!(*counts.lock().unwrap(), vec![(1, 1)]);
}

#[test]
fn notification_carries_area_and_new_value() {
    let storage = Storage::in_memory();
    let store = RecordStore::new(storage.clone());
    let changes: Arc<Mutex<Vec<StorageChange>>> = Arc::default();
    let sink = changes.clone();
    let _sub = storage.on_changed(move |change| sink.lock().unwrap().push(change.clone()));

    store.append(record("A")).unwrap();

    let changes = changes.lock().unwrap();
    assert_eq!(changes.len(), 1);
    let json = serde_json::to_value(&changes[0]).unwrap();
    assert_eq!(json["area"], "local");
    assert_eq!(json["changes"][JOBS_KEY]["newValue"][0]["title"], "A");
    assert!(json["changes"][JOBS_KEY].get("oldValue").is_none());
}

#[test]
fn rejected_write_leaves_collection_and_observers_untouched() {
    let storage = Storage::open(MemoryBackend::rejecting_writes()).unwrap();
    let store = RecordStore::new(storage);
    let (seen, _sub) = recorder(&store);

    let err = store.append(record("A")).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
    assert!(store.load().unwrap().is_empty());
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn file_backend_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let a = record("A");
    let b = record("B");
    {
        let store = RecordStore::new(Storage::open(JsonFileBackend::new(temp.path().into())).unwrap());
        store.append(a.clone()).unwrap();
        store.append(b.clone()).unwrap();
        store.update_status(a.id, JobStatus::Rejected).unwrap();
    }

    let store = RecordStore::new(Storage::open(JsonFileBackend::new(temp.path().into())).unwrap());
    let jobs = store.load().unwrap();
    assert_eq!(titles(&jobs), vec!["B", "A"]);
    assert_eq!(jobs[0], b);
    assert_eq!(jobs[1].status, JobStatus::Rejected);
    assert!(temp.path().join("storage.json").is_file());
}

#[test]
fn corrupt_storage_file_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("storage.json"), "{ not json").unwrap();
    assert!(Storage::open(JsonFileBackend::new(temp.path().into())).is_err());
}

#[test]
fn stored_record_with_blank_date_does_not_block_the_store() {
    let temp = TempDir::new().unwrap();
    let blank_id = Uuid::new_v4();
    let seeded = serde_json::json!({
        "jobs": [{
            "id": blank_id,
            "title": "Saved without a date",
            "company": "",
            "url": "https://jobs.example.com/blank",
            "description": "",
            "status": "Applied",
            "date": "",
            "createdAt": "2025-01-01T00:00:00Z"
        }]
    });
    std::fs::write(temp.path().join("storage.json"), seeded.to_string()).unwrap();
    let store = RecordStore::new(Storage::open(JsonFileBackend::new(temp.path().into())).unwrap());

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].date, None);

    store.append(record("Fresh")).unwrap();
    assert!(store.update_status(blank_id, JobStatus::Rejected).unwrap());
    assert!(store.remove(blank_id).unwrap());
    assert_eq!(titles(&store.load().unwrap()), vec!["Fresh"]);
}
