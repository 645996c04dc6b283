use crate::error::StoreError;
use crate::event::{EventEntry, EventRecord};
use crate::persist::{self, EventMap};
use chrono::NaiveDateTime;
use fs2::FileExt;
use log::{debug, info};
use std::collections::btree_map;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Whether a store guards its backing file against other stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockMode {
    /// No locking. Two stores on the same file overwrite each other's saves;
    /// the last writer wins.
    #[default]
    None,
    /// Hold an exclusive advisory lock on `<file>.lock` for the lifetime of
    /// the store. Opening a second exclusive store on the same file fails
    /// with [`StoreError::Locked`].
    Exclusive,
}

/// Configures and opens an [`EventStore`].
///
/// # Examples
///
/// ```no_run
/// use ticketbook::{EventStore, LockMode};
///
/// let store = EventStore::builder("events.json")
///     .lock_mode(LockMode::Exclusive)
///     .open()?;
/// # Ok::<(), ticketbook::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EventStoreBuilder {
    path: PathBuf,
    lock_mode: LockMode,
}

impl EventStoreBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        EventStoreBuilder {
            path: path.as_ref().to_path_buf(),
            lock_mode: LockMode::default(),
        }
    }

    /// Set the locking behaviour. Defaults to [`LockMode::None`].
    pub fn lock_mode(mut self, mode: LockMode) -> Self {
        self.lock_mode = mode;
        self
    }

    /// Open the store: create the parent directory if needed, take the lock
    /// if requested, and load the backing file (missing means empty).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Locked`] if another exclusive store holds the
    /// file, [`StoreError::Io`] on filesystem failures, and
    /// [`StoreError::Parse`] if the backing file is malformed.
    pub fn open(self) -> Result<EventStore, StoreError> {
        let path = self.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let lock = match self.lock_mode {
            LockMode::None => None,
            LockMode::Exclusive => Some(acquire_lock(&path)?),
        };

        let events = persist::load(&path)?;
        debug!(
            "opened event store at {} ({} events, {:?} lock)",
            path.display(),
            events.len(),
            self.lock_mode
        );

        Ok(EventStore {
            path,
            events,
            _lock: lock,
        })
    }
}

fn acquire_lock(path: &Path) -> Result<File, StoreError> {
    let lock_path = persist::sidecar_path(path, "lock");
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| StoreError::io(&lock_path, e))?;
    file.try_lock_exclusive().map_err(|e| {
        if e.kind() == fs2::lock_contended_error().kind() {
            StoreError::Locked {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::io(&lock_path, e)
        }
    })?;
    Ok(file)
}

/// The event registry: every event by name, mirrored to one JSON file.
///
/// The whole map is loaded when the store opens and rewritten after each
/// successful mutation, so once [`book`](Self::book), [`cancel`](Self::cancel),
/// [`create`](Self::create) or [`delete`](Self::delete) returns `Ok(true)` the
/// file matches memory. Calls that return `Ok(false)` change nothing and write
/// nothing.
///
/// # Examples
///
/// ```
/// use ticketbook::{EventStore, parse_date};
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut store = EventStore::open(dir.path().join("events.json")).unwrap();
///
/// let date = parse_date("2024-01-01 20:00").unwrap();
/// assert!(store.create("Concert", date, 1).unwrap());
/// assert!(store.book("Concert").unwrap());
/// assert!(!store.book("Concert").unwrap());
/// assert_eq!(store.check_availability("Concert"), Some(0));
/// ```
#[derive(Debug)]
pub struct EventStore {
    path: PathBuf,
    events: EventMap,
    _lock: Option<File>,
}

impl EventStore {
    /// Open a store on `path` with default settings.
    ///
    /// # Errors
    ///
    /// See [`EventStoreBuilder::open`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::builder(path).open()
    }

    /// Start configuring a store on `path`.
    pub fn builder(path: impl AsRef<Path>) -> EventStoreBuilder {
        EventStoreBuilder::new(path)
    }

    /// Read the backing file as it is on disk now.
    ///
    /// Does not touch the in-memory map.
    ///
    /// # Errors
    ///
    /// See [`persist::load`].
    pub fn load(&self) -> Result<EventMap, StoreError> {
        persist::load(&self.path)
    }

    /// Write the in-memory map to the backing file.
    ///
    /// # Errors
    ///
    /// See [`persist::save`].
    pub fn save(&self) -> Result<(), StoreError> {
        persist::save(&self.path, &self.events)
    }

    /// Every event, in name order. Call again to start over.
    pub fn list(&self) -> Entries<'_> {
        Entries {
            inner: self.events.iter(),
        }
    }

    /// Events whose name contains `needle`, ignoring case.
    pub fn search(&self, needle: &str) -> Search<'_> {
        Search {
            entries: self.list(),
            needle: needle.to_lowercase(),
        }
    }

    /// Take one ticket for `name`.
    ///
    /// Returns `Ok(false)` without touching anything if the event does not
    /// exist or has no tickets left.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the new count fails.
    pub fn book(&mut self, name: &str) -> Result<bool, StoreError> {
        let remaining = match self.events.get_mut(name) {
            Some(record) if record.available_tickets > 0 => {
                record.available_tickets -= 1;
                record.available_tickets
            }
            _ => return Ok(false),
        };
        self.save()?;
        info!("booked a ticket for {name:?}, {remaining} left");
        Ok(true)
    }

    /// Give one ticket back to `name`.
    ///
    /// Any existing event accepts the ticket, whatever its current count.
    /// Returns `Ok(false)` only if the event does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TicketOverflow`] without touching anything if
    /// the count is already `i64::MAX`, or an error if persisting the new
    /// count fails.
    pub fn cancel(&mut self, name: &str) -> Result<bool, StoreError> {
        let Some(record) = self.events.get_mut(name) else {
            return Ok(false);
        };
        let remaining =
            record
                .available_tickets
                .checked_add(1)
                .ok_or_else(|| StoreError::TicketOverflow {
                    name: name.to_string(),
                })?;
        record.available_tickets = remaining;
        self.save()?;
        info!("cancelled a ticket for {name:?}, {remaining} left");
        Ok(true)
    }

    /// Add a new event.
    ///
    /// Returns `Ok(false)` and leaves the existing record alone if `name` is
    /// already taken.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the new event fails.
    pub fn create(
        &mut self,
        name: &str,
        date: NaiveDateTime,
        available_tickets: i64,
    ) -> Result<bool, StoreError> {
        match self.events.entry(name.to_string()) {
            btree_map::Entry::Occupied(_) => return Ok(false),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(EventRecord::new(date, available_tickets));
            }
        }
        self.save()?;
        info!("created event {name:?} with {available_tickets} tickets");
        Ok(true)
    }

    /// Remove an event.
    ///
    /// Returns `Ok(false)` if there was nothing to remove.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the removal fails.
    pub fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        if self.events.remove(name).is_none() {
            return Ok(false);
        }
        self.save()?;
        info!("deleted event {name:?}");
        Ok(true)
    }

    /// Tickets left for `name`, or `None` if there is no such event.
    pub fn check_availability(&self, name: &str) -> Option<i64> {
        self.events.get(name).map(|r| r.available_tickets)
    }

    /// The record for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&EventRecord> {
        self.events.get(name)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether there are no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the path to the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Iterator over all events, returned by [`EventStore::list`].
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    inner: btree_map::Iter<'a, String, EventRecord>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = EventEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, record)| EventEntry {
            name: name.as_str(),
            date: record.date,
            available_tickets: record.available_tickets,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over events matching a name fragment, returned by
/// [`EventStore::search`].
#[derive(Debug, Clone)]
pub struct Search<'a> {
    entries: Entries<'a>,
    needle: String,
}

impl<'a> Iterator for Search<'a> {
    type Item = EventEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = &self.needle;
        self.entries
            .find(|entry| entry.name.to_lowercase().contains(needle.as_str()))
    }
}
