//! End-to-end store scenarios exercised through the public API

use chrono::NaiveDate;
use habitstore::{HabitStore, StoreError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_create_toggle_aggregate_roundtrip() {
    let mut store = HabitStore::new();
    let habit = store.create("Morning run", Some(30)).unwrap();
    let d = date(2026, 5, 4);

    store.toggle(&habit.id, d).unwrap();

    let rows = store.aggregate();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Morning run");
    assert_eq!(rows[0].streak, 1);
    assert_eq!(rows[0].completions, 1);

    // Toggling the same date off reverts the aggregate
    store.toggle(&habit.id, d).unwrap();
    let rows = store.aggregate();
    assert_eq!(rows[0].streak, 0);
    assert_eq!(rows[0].completions, 0);
}

#[test]
fn test_delete_then_list_reflects_removal() {
    let mut store = HabitStore::new();
    let first = store.create("Stretch", None).unwrap();
    store.create("Hydrate", None).unwrap();

    store.delete(&first.id);

    let titles: Vec<&str> = store.list().iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["Hydrate"]);

    // Deleting again is a no-op, not an error
    store.delete(&first.id);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_rejected_create_leaves_list_unchanged() {
    let mut store = HabitStore::new();
    store.create("Keep me", None).unwrap();

    let err = store.create("   ", None).unwrap_err();
    assert!(err.is_validation());

    let titles: Vec<&str> = store.list().iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["Keep me"]);
}

#[test]
fn test_toggle_unknown_id_is_not_found() {
    let mut store = HabitStore::new();
    store.create("Exists", None).unwrap();

    match store.toggle("missing-id", date(2026, 5, 4)) {
        Err(StoreError::NotFound { id }) => assert_eq!(id, "missing-id"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_streaks_are_per_habit() {
    let mut store = HabitStore::new();
    let run = store.create("Run", None).unwrap();
    let read = store.create("Read", None).unwrap();

    for day in 1..=3 {
        store.toggle(&run.id, date(2026, 6, day)).unwrap();
    }
    store.toggle(&read.id, date(2026, 6, 1)).unwrap();

    assert_eq!(store.get(&run.id).map(|h| h.streak), Some(3));
    assert_eq!(store.get(&read.id).map(|h| h.streak), Some(1));
}
