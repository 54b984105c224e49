//! Integration tests for on-disk persistence and load-time reconciliation
//! of blobs written by earlier (or buggier) versions of the app.

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::tempdir;
use tickdown_core::{
    EventStore, FileStore, ManualClock, SettingsStore, TimerOptions, TimerStatus, TimerStore,
};

const T0: u64 = 1_700_000_000_000;

fn open_timers(dir: &Path, clock: &ManualClock) -> TimerStore {
    TimerStore::new(
        Box::new(FileStore::open_at(dir).unwrap()),
        Box::new(clock.clone()),
    )
}

fn seed_timers(dir: &Path, blob: serde_json::Value) {
    fs::write(dir.join("countdown_timers.json"), blob.to_string()).unwrap();
}

fn timer_entry(status: &str, end: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "t1",
        "hours": 0,
        "minutes": 1,
        "seconds": 30,
        "total_secs": 90,
        "remaining_secs": 45,
        "end_epoch_ms": end,
        "status": status,
        "label": "seeded"
    })
}

#[test]
fn test_timers_survive_restart_on_disk() {
    let dir = tempdir().unwrap();
    let clock = ManualClock::new(T0);

    let mut store = open_timers(dir.path(), &clock);
    let id = store.add(TimerOptions {
        minutes: Some(2),
        ..Default::default()
    });
    store.start(&id);
    drop(store);

    clock.advance_secs(30);
    let store = open_timers(dir.path(), &clock);

    let timer = store.get_timer(&id).unwrap();
    assert_eq!(timer.status, TimerStatus::Running);
    assert_eq!(timer.remaining_secs, 90);
    assert_eq!(timer.end_epoch_ms, Some(T0 + 120_000));
}

#[test]
fn test_each_collection_gets_its_own_file() {
    let dir = tempdir().unwrap();
    let clock = ManualClock::new(T0);

    let mut timers = open_timers(dir.path(), &clock);
    timers.add(TimerOptions::default());

    let mut events = EventStore::new(
        Box::new(FileStore::open_at(dir.path()).unwrap()),
        Box::new(clock.clone()),
    );
    events.add("launch", chrono::DateTime::from_timestamp_millis(T0 as i64).unwrap());

    let mut settings = SettingsStore::new(Box::new(FileStore::open_at(dir.path()).unwrap()));
    settings.set_volume(10);

    assert!(dir.path().join("countdown_timers.json").exists());
    assert!(dir.path().join("countdown_events.json").exists());
    assert!(dir.path().join("countdown_settings.json").exists());
}

#[test]
fn test_running_blob_without_end_demotes_to_paused() {
    let dir = tempdir().unwrap();
    let mut entry = timer_entry("running", json!(null));
    entry.as_object_mut().unwrap().remove("end_epoch_ms");
    seed_timers(dir.path(), json!([entry]));

    let store = open_timers(dir.path(), &ManualClock::new(T0));

    let timer = store.get_timer("t1").unwrap();
    assert_eq!(timer.status, TimerStatus::Paused);
    assert_eq!(timer.remaining_secs, 45);
    assert_eq!(timer.end_epoch_ms, None);
}

#[test]
fn test_running_blob_with_malformed_end_demotes_to_paused() {
    for end in [json!("soon"), json!(12.5), json!(-5)] {
        let dir = tempdir().unwrap();
        seed_timers(dir.path(), json!([timer_entry("running", end.clone())]));

        let store = open_timers(dir.path(), &ManualClock::new(T0));

        let timer = store.get_timer("t1").unwrap();
        assert_eq!(timer.status, TimerStatus::Paused, "end = {end}");
        assert_eq!(timer.remaining_secs, 45);
    }
}

#[test]
fn test_running_blob_with_future_end_recomputes_remaining() {
    let dir = tempdir().unwrap();
    seed_timers(
        dir.path(),
        json!([timer_entry("running", json!(T0 + 90_000))]),
    );

    // Thirty seconds of the countdown elapsed while nothing was loaded;
    // the stale remaining_secs of 45 must be ignored.
    let store = open_timers(dir.path(), &ManualClock::new(T0 + 30_000));

    let timer = store.get_timer("t1").unwrap();
    assert_eq!(timer.status, TimerStatus::Running);
    assert_eq!(timer.remaining_secs, 60);
    assert_eq!(timer.end_epoch_ms, Some(T0 + 90_000));
}

#[test]
fn test_running_blob_with_passed_end_completes() {
    let dir = tempdir().unwrap();
    seed_timers(
        dir.path(),
        json!([timer_entry("running", json!(T0 - 1_000))]),
    );

    let store = open_timers(dir.path(), &ManualClock::new(T0));

    let timer = store.get_timer("t1").unwrap();
    assert_eq!(timer.status, TimerStatus::Completed);
    assert_eq!(timer.remaining_secs, 0);
    assert_eq!(timer.end_epoch_ms, None);
}

#[test]
fn test_non_running_blobs_pass_through_unchanged() {
    let dir = tempdir().unwrap();
    let entries: Vec<serde_json::Value> = ["idle", "paused", "completed"]
        .iter()
        .map(|status| {
            let mut entry = timer_entry(status, json!(null));
            entry
                .as_object_mut()
                .unwrap()
                .insert("id".to_string(), json!(format!("t-{status}")));
            entry
        })
        .collect();
    seed_timers(dir.path(), json!(entries));

    let store = open_timers(dir.path(), &ManualClock::new(T0 + 3_600_000));

    let statuses: Vec<TimerStatus> = store.timers().iter().map(|t| t.status).collect();
    assert_eq!(
        statuses,
        vec![
            TimerStatus::Idle,
            TimerStatus::Paused,
            TimerStatus::Completed
        ]
    );
    assert!(store.timers().iter().all(|t| t.remaining_secs == 45));
}

#[test]
fn test_unknown_blob_fields_are_ignored() {
    let dir = tempdir().unwrap();
    let mut entry = timer_entry("paused", json!(null));
    entry
        .as_object_mut()
        .unwrap()
        .insert("color".to_string(), json!("red"));
    seed_timers(dir.path(), json!([entry]));

    let store = open_timers(dir.path(), &ManualClock::new(T0));
    assert_eq!(store.get_timer("t1").unwrap().remaining_secs, 45);
}

#[test]
fn test_corrupt_file_yields_empty_collection() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("countdown_timers.json"), "{not json").unwrap();

    let clock = ManualClock::new(T0);
    let mut store = open_timers(dir.path(), &clock);
    assert!(store.timers().is_empty());

    // The bad file is left alone until a real mutation replaces it.
    let on_disk = fs::read_to_string(dir.path().join("countdown_timers.json")).unwrap();
    assert_eq!(on_disk, "{not json");

    store.add(TimerOptions::default());
    let on_disk = fs::read_to_string(dir.path().join("countdown_timers.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}

#[test]
fn test_settings_round_trip_on_disk() {
    let dir = tempdir().unwrap();

    let mut settings = SettingsStore::new(Box::new(FileStore::open_at(dir.path()).unwrap()));
    settings.set_sound_enabled(false);
    settings.set_volume(25);
    drop(settings);

    let reloaded = SettingsStore::new(Box::new(FileStore::open_at(dir.path()).unwrap()));
    assert!(!reloaded.settings().sound_enabled);
    assert_eq!(reloaded.settings().volume, 25);
}
