//! Whole-file persistence of the event map.
//!
//! The backing file is a single JSON object keyed by event name, rewritten in
//! full on every save:
//!
//! ```text
//! $ cat events.json
//! {
//!     "Concert": {
//!         "date": "2024-01-01 20:00",
//!         "available_tickets": 1
//!     }
//! }
//! ```

use crate::error::StoreError;
use crate::event::EventRecord;
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Event name to record. Iterates in ascending name order.
pub type EventMap = BTreeMap<String, EventRecord>;

/// Load the event map from `path`.
///
/// A missing file is an empty map, not an error. A leftover `.tmp` file from
/// an interrupted save is ignored.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file exists but cannot be read, and
/// [`StoreError::Parse`] if its contents are not an event map (including
/// dates not in `YYYY-MM-DD HH:MM`).
pub fn load(path: &Path) -> Result<EventMap, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("no event file at {}, starting empty", path.display());
            return Ok(EventMap::new());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let tmp_path = tmp_path(path);
    if tmp_path.exists() {
        warn!(
            "ignoring {} left behind by an interrupted save",
            tmp_path.display()
        );
    }

    let events: EventMap =
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Save the event map to `path`, replacing whatever was there.
///
/// Output is pretty-printed with 4-space indentation. The JSON goes to a
/// `.tmp` sibling first, is synced, then renamed over `path`, so a crash
/// mid-write leaves the previous file intact.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if writing, syncing or renaming fails.
pub fn save(path: &Path, events: &EventMap) -> Result<(), StoreError> {
    let tmp_path = tmp_path(path);

    let mut json = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut json, formatter);
    events
        .serialize(&mut serializer)
        .map_err(|e| StoreError::io(path, io::Error::new(io::ErrorKind::InvalidData, e)))?;

    let mut file = fs::File::create(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;
    file.write_all(&json)
        .and_then(|()| file.sync_data())
        .map_err(|e| StoreError::io(&tmp_path, e))?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| StoreError::io(path, e))?;
    debug!("saved {} events to {}", events.len(), path.display());
    Ok(())
}

/// `events.json` -> `events.json.<suffix>`
pub(crate) fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    sidecar_path(path, "tmp")
}
