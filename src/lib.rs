pub mod cli;
mod error;
mod event;
pub mod persist;
mod store;

pub use error::{CliError, DateError, StoreError};
pub use event::{DATE_FORMAT, EventEntry, EventRecord, parse_date};
pub use persist::EventMap;
pub use store::{Entries, EventStore, EventStoreBuilder, LockMode, Search};
