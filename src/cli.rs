//! The interactive numbered menu.
//!
//! [`run`] drives an [`EventStore`] from any line-oriented input, so the
//! binary hands it stdin/stdout and tests hand it in-memory buffers.

use crate::error::CliError;
use crate::event::parse_date;
use crate::store::EventStore;
use log::debug;
use std::io::{BufRead, Write};

const MENU: &str = "
Ticket Booking System Options:
1. List All Events
2. Search for an Event
3. Book Ticket
4. Cancel Ticket
5. Create Event
6. Delete Event
7. Check Ticket Availability
8. Exit
";

const NO_EVENTS: &str = "No events found.";
const NO_MATCHES: &str = "No matching events found.";
const NOT_BOOKABLE: &str = "Ticket not available or event does not exist.";
const NO_SUCH_EVENT: &str = "Event does not exist.";
const DUPLICATE_EVENT: &str = "Event already exists.";
const INVALID_OPTION: &str = "Invalid option, please try again.";

/// Run the menu until the user picks "Exit" or input runs out.
///
/// Business outcomes (sold out, unknown event, duplicate name) are printed
/// and the loop carries on.
///
/// # Errors
///
/// The session ends with an error if the terminal fails, the store cannot
/// persist, or the user enters a date or ticket count that does not parse.
pub fn run<R: BufRead, W: Write>(
    store: &mut EventStore,
    input: R,
    output: W,
) -> Result<(), CliError> {
    let mut session = Session { input, output };

    loop {
        write!(session.output, "{MENU}")?;
        let Some(choice) = session.prompt("Choose an option: ")? else {
            break;
        };

        match choice.trim() {
            "1" => session.list(store)?,
            "2" => session.search(store)?,
            "3" => session.book(store)?,
            "4" => session.cancel(store)?,
            "5" => session.create(store)?,
            "6" => session.delete(store)?,
            "7" => session.check_availability(store)?,
            "8" => break,
            _ => writeln!(session.output, "{INVALID_OPTION}")?,
        }
    }

    session.output.flush()?;
    Ok(())
}

struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Print `text`, then read one line without its terminator.
    /// `None` means end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>, CliError> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("input closed");
            return Ok(None);
        }
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        Ok(Some(line))
    }

    fn list(&mut self, store: &EventStore) -> Result<(), CliError> {
        if store.is_empty() {
            writeln!(self.output, "{NO_EVENTS}")?;
            return Ok(());
        }
        for entry in store.list() {
            writeln!(self.output, "{entry}")?;
        }
        Ok(())
    }

    fn search(&mut self, store: &EventStore) -> Result<(), CliError> {
        let Some(needle) = self.prompt("Enter the name or part of the event name to search: ")?
        else {
            return Ok(());
        };
        let mut found = false;
        for entry in store.search(&needle) {
            writeln!(self.output, "{entry}")?;
            found = true;
        }
        if !found {
            writeln!(self.output, "{NO_MATCHES}")?;
        }
        Ok(())
    }

    fn book(&mut self, store: &mut EventStore) -> Result<(), CliError> {
        let Some(name) = self.prompt("Enter the event name to book a ticket for: ")? else {
            return Ok(());
        };
        if store.book(&name)? {
            writeln!(self.output, "Ticket booked for {name}.")?;
        } else {
            writeln!(self.output, "{NOT_BOOKABLE}")?;
        }
        Ok(())
    }

    fn cancel(&mut self, store: &mut EventStore) -> Result<(), CliError> {
        let Some(name) = self.prompt("Enter the event name to cancel the ticket for: ")? else {
            return Ok(());
        };
        if store.cancel(&name)? {
            writeln!(self.output, "Ticket booking cancelled for {name}.")?;
        } else {
            writeln!(self.output, "{NO_SUCH_EVENT}")?;
        }
        Ok(())
    }

    fn create(&mut self, store: &mut EventStore) -> Result<(), CliError> {
        let Some(name) = self.prompt("Enter the name of the event: ")? else {
            return Ok(());
        };
        let Some(date) =
            self.prompt("Enter the date and time of the event (YYYY-MM-DD HH:MM): ")?
        else {
            return Ok(());
        };
        let Some(tickets) = self.prompt("Enter the number of available tickets: ")? else {
            return Ok(());
        };

        let tickets = tickets.trim();
        let available_tickets: i64 =
            tickets
                .parse()
                .map_err(|source| CliError::InvalidTicketCount {
                    input: tickets.to_string(),
                    source,
                })?;
        let date = parse_date(date.trim())?;

        if store.create(&name, date, available_tickets)? {
            writeln!(self.output, "Event '{name}' created successfully.")?;
        } else {
            writeln!(self.output, "{DUPLICATE_EVENT}")?;
        }
        Ok(())
    }

    fn delete(&mut self, store: &mut EventStore) -> Result<(), CliError> {
        let Some(name) = self.prompt("Enter the name of the event to delete: ")? else {
            return Ok(());
        };
        if store.delete(&name)? {
            writeln!(self.output, "Event '{name}' deleted successfully.")?;
        } else {
            writeln!(self.output, "{NO_SUCH_EVENT}")?;
        }
        Ok(())
    }

    fn check_availability(&mut self, store: &EventStore) -> Result<(), CliError> {
        let Some(name) =
            self.prompt("Enter the name of the event to check ticket availability: ")?
        else {
            return Ok(());
        };
        match store.check_availability(&name) {
            Some(count) => writeln!(self.output, "Available tickets for {name}: {count}")?,
            None => writeln!(self.output, "{NO_SUCH_EVENT}")?,
        }
        Ok(())
    }
}
