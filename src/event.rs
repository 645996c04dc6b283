use crate::error::DateError;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text format of event dates, both on disk and at the menu prompt.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The stored part of an event: when it happens and how many tickets remain.
///
/// Records are keyed by event name in the backing file, so the name is not a
/// field here. On disk a record looks like:
///
/// ```text
/// "Concert": {
///     "date": "2024-01-01 20:00",
///     "available_tickets": 120
/// }
/// ```
///
/// Dates have minute precision: [`EventRecord::new`] drops seconds, so the
/// record in memory is exactly what a save writes and a load reads back.
///
/// # Examples
///
/// ```
/// use ticketbook::{EventRecord, parse_date};
///
/// let record = EventRecord::new(parse_date("2024-01-01 20:00").unwrap(), 120);
/// let json = serde_json::to_string(&record).unwrap();
/// assert_eq!(json, r#"{"date":"2024-01-01 20:00","available_tickets":120}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct EventRecord {
    /// When the event takes place.
    #[serde(with = "date_format")]
    pub date: NaiveDateTime,

    /// Remaining inventory. Not clamped: cancellations can push it past the
    /// count the event was created with, and a file may hold negative values.
    pub available_tickets: i64,
}

impl EventRecord {
    /// Create a record, truncating `date` to the minute.
    pub fn new(date: NaiveDateTime, available_tickets: i64) -> Self {
        EventRecord {
            date: truncate_to_minute(date),
            available_tickets,
        }
    }
}

/// One `(name, date, available_tickets)` row yielded by listing or searching.
///
/// Displays as the line the menu prints:
///
/// ```
/// use ticketbook::{EventEntry, parse_date};
///
/// let entry = EventEntry {
///     name: "Concert",
///     date: parse_date("2024-01-01 20:00").unwrap(),
///     available_tickets: 3,
/// };
/// assert_eq!(
///     entry.to_string(),
///     "Event: Concert, Date: 2024-01-01 20:00, Available Tickets: 3"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventEntry<'a> {
    pub name: &'a str,
    pub date: NaiveDateTime,
    pub available_tickets: i64,
}

impl fmt::Display for EventEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event: {}, Date: {}, Available Tickets: {}",
            self.name,
            self.date.format(DATE_FORMAT),
            self.available_tickets
        )
    }
}

/// Parse user-entered date text in [`DATE_FORMAT`].
///
/// # Errors
///
/// Returns a [`DateError`] if the text does not match.
///
/// # Examples
///
/// ```
/// use chrono::Timelike;
/// use ticketbook::parse_date;
///
/// let date = parse_date("2024-06-30 18:45").unwrap();
/// assert_eq!((date.hour(), date.minute()), (18, 45));
/// assert!(parse_date("30/06/2024").is_err());
/// ```
pub fn parse_date(input: &str) -> Result<NaiveDateTime, DateError> {
    NaiveDateTime::parse_from_str(input, DATE_FORMAT).map_err(|source| DateError {
        input: input.to_string(),
        source,
    })
}

fn truncate_to_minute(date: NaiveDateTime) -> NaiveDateTime {
    date.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(date)
}

mod date_format {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, DATE_FORMAT)
            .map_err(|e| serde::de::Error::custom(format!("invalid date {text:?}: {e}")))
    }
}
