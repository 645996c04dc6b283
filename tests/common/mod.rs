#![allow(dead_code)]

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use ticketbook::{EventStore, parse_date};

pub fn date(text: &str) -> NaiveDateTime {
    parse_date(text).unwrap()
}

pub fn events_path(dir: &Path) -> PathBuf {
    dir.join("events.json")
}

pub fn open_store(dir: &Path) -> EventStore {
    EventStore::open(events_path(dir)).unwrap()
}

/// A store holding one event, "Concert", with `tickets` left.
pub fn concert_store(dir: &Path, tickets: i64) -> EventStore {
    let mut store = open_store(dir);
    assert!(store.create("Concert", date("2024-01-01 20:00"), tickets).unwrap());
    store
}

/// A store with a few events whose names differ in case and spacing.
pub fn seeded_store(dir: &Path) -> EventStore {
    let mut store = open_store(dir);
    store.create("Rock Concert", date("2024-03-01 19:30"), 100).unwrap();
    store.create("Jazz Night", date("2024-03-05 21:00"), 40).unwrap();
    store.create("concert for kids", date("2024-03-09 10:00"), 0).unwrap();
    store.create("Opera", date("2024-04-12 18:00"), 12).unwrap();
    store
}
