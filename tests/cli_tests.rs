mod common;

use common::{concert_store, open_store, seeded_store};
use std::io::Cursor;
use tempfile::tempdir;
use ticketbook::{CliError, EventStore, StoreError, cli};

const MENU: &str = "\nTicket Booking System Options:\n\
1. List All Events\n\
2. Search for an Event\n\
3. Book Ticket\n\
4. Cancel Ticket\n\
5. Create Event\n\
6. Delete Event\n\
7. Check Ticket Availability\n\
8. Exit\n\
Choose an option: ";

/// Feed `input` to the menu and return everything it printed.
fn session(store: &mut EventStore, input: &str) -> String {
    let mut output = Vec::new();
    cli::run(store, Cursor::new(input), &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

/// Printed lines with the menu and prompts stripped out.
fn replies(transcript: &str) -> Vec<String> {
    transcript
        .split(MENU)
        .flat_map(|chunk| chunk.lines())
        .map(|line| {
            // Input is not echoed, so replies share a line with the prompts before them.
            let mut rest = line;
            while rest.starts_with("Enter ") {
                match rest.find(": ") {
                    Some(pos) => rest = &rest[pos + 2..],
                    None => break,
                }
            }
            rest.to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

#[test]
fn test_exit_immediately() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    let out = session(&mut store, "8\n");
    assert_eq!(out, MENU);
}

#[test]
fn test_eof_ends_session() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    let out = session(&mut store, "");
    assert_eq!(out, MENU);
}

#[test]
fn test_eof_mid_prompt_ends_session() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    let out = session(&mut store, "5\nHalf Made");
    assert!(out.ends_with(MENU));
    assert!(store.is_empty());
}

#[test]
fn test_list_empty() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    let out = session(&mut store, "1\n8\n");
    assert_eq!(replies(&out), vec!["No events found."]);
}

#[test]
fn test_list_events() {
    let dir = tempdir().unwrap();
    let mut store = seeded_store(dir.path());

    let out = session(&mut store, "1\n8\n");
    assert_eq!(
        replies(&out),
        vec![
            "Event: Jazz Night, Date: 2024-03-05 21:00, Available Tickets: 40",
            "Event: Opera, Date: 2024-04-12 18:00, Available Tickets: 12",
            "Event: Rock Concert, Date: 2024-03-01 19:30, Available Tickets: 100",
            "Event: concert for kids, Date: 2024-03-09 10:00, Available Tickets: 0",
        ]
    );
}

#[test]
fn test_search() {
    let dir = tempdir().unwrap();
    let mut store = seeded_store(dir.path());

    let out = session(&mut store, "2\nCONCERT\n2\nballet\n8\n");
    assert_eq!(
        replies(&out),
        vec![
            "Event: Rock Concert, Date: 2024-03-01 19:30, Available Tickets: 100",
            "Event: concert for kids, Date: 2024-03-09 10:00, Available Tickets: 0",
            "No matching events found.",
        ]
    );
}

#[test]
fn test_book_and_cancel() {
    let dir = tempdir().unwrap();
    let mut store = concert_store(dir.path(), 1);

    let out = session(&mut store, "3\nConcert\n3\nConcert\n4\nConcert\n4\nGhost\n8\n");
    assert_eq!(
        replies(&out),
        vec![
            "Ticket booked for Concert.",
            "Ticket not available or event does not exist.",
            "Ticket booking cancelled for Concert.",
            "Event does not exist.",
        ]
    );
    assert_eq!(store.check_availability("Concert"), Some(1));
}

#[test]
fn test_create_and_duplicate() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    let out = session(
        &mut store,
        "5\nNew Event\n2024-02-02 12:00\n20\n5\nNew Event\n2030-01-01 00:00\n5\n8\n",
    );
    assert_eq!(
        replies(&out),
        vec!["Event 'New Event' created successfully.", "Event already exists."]
    );

    let loaded = store.load().unwrap();
    assert_eq!(loaded["New Event"].available_tickets, 20);
    assert_eq!(loaded["New Event"].date, common::date("2024-02-02 12:00"));
}

#[test]
fn test_create_trims_number_and_date() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    session(&mut store, "5\nPadded\n 2024-02-02 12:00 \n  7 \n8\n");
    assert_eq!(store.check_availability("Padded"), Some(7));
}

#[test]
fn test_create_keeps_name_verbatim() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    session(&mut store, "5\n  Spaced  \n2024-02-02 12:00\n1\n8\n");
    assert_eq!(store.check_availability("  Spaced  "), Some(1));
    assert_eq!(store.check_availability("Spaced"), None);
}

#[test]
fn test_create_negative_tickets_allowed() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    session(&mut store, "5\nOversold\n2024-02-02 12:00\n-4\n8\n");
    assert_eq!(store.check_availability("Oversold"), Some(-4));
}

#[test]
fn test_create_bad_ticket_count_ends_session() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    let mut output = Vec::new();
    let err = cli::run(
        &mut store,
        Cursor::new("5\nShow\n2024-02-02 12:00\nlots\n8\n"),
        &mut output,
    )
    .unwrap_err();

    match err {
        CliError::InvalidTicketCount { input, .. } => assert_eq!(input, "lots"),
        other => panic!("expected InvalidTicketCount, got {other:?}"),
    }
    assert!(store.is_empty());
}

#[test]
fn test_create_bad_date_ends_session() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    let mut output = Vec::new();
    let err = cli::run(
        &mut store,
        Cursor::new("5\nShow\nnext friday\n10\n8\n"),
        &mut output,
    )
    .unwrap_err();

    assert!(
        matches!(&err, CliError::InvalidDate(e) if e.input == "next friday"),
        "got {err:?}"
    );
    assert!(store.is_empty());
}

#[test]
fn test_cancel_overflow_ends_session() {
    let dir = tempdir().unwrap();
    let mut store = concert_store(dir.path(), i64::MAX);

    let mut output = Vec::new();
    let err = cli::run(&mut store, Cursor::new("4\nConcert\n8\n"), &mut output).unwrap_err();

    assert!(
        matches!(err, CliError::Store(StoreError::TicketOverflow { .. })),
        "got {err:?}"
    );
    assert_eq!(store.check_availability("Concert"), Some(i64::MAX));
}

#[test]
fn test_delete() {
    let dir = tempdir().unwrap();
    let mut store = concert_store(dir.path(), 10);

    let out = session(&mut store, "6\nConcert\n6\nConcert\n8\n");
    assert_eq!(
        replies(&out),
        vec!["Event 'Concert' deleted successfully.", "Event does not exist."]
    );
    assert!(store.is_empty());
}

#[test]
fn test_check_availability() {
    let dir = tempdir().unwrap();
    let mut store = concert_store(dir.path(), 5);

    let out = session(&mut store, "7\nConcert\n7\nOpera\n8\n");
    assert_eq!(
        replies(&out),
        vec!["Available tickets for Concert: 5", "Event does not exist."]
    );
}

#[test]
fn test_invalid_option_reprompts() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    let out = session(&mut store, "9\nbook\n\n8\n");
    assert_eq!(
        replies(&out),
        vec![
            "Invalid option, please try again.",
            "Invalid option, please try again.",
            "Invalid option, please try again.",
        ]
    );
    assert_eq!(out.matches(MENU).count(), 4);
}

#[test]
fn test_windows_line_endings() {
    let dir = tempdir().unwrap();
    let mut store = concert_store(dir.path(), 2);

    let out = session(&mut store, "3\r\nConcert\r\n8\r\n");
    assert_eq!(replies(&out), vec!["Ticket booked for Concert."]);
}

#[test]
fn test_prompts_are_printed() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    let out = session(&mut store, "5\nX\n2024-01-01 00:00\n1\n8\n");
    assert!(out.contains("Enter the name of the event: "));
    assert!(out.contains("Enter the date and time of the event (YYYY-MM-DD HH:MM): "));
    assert!(out.contains("Enter the number of available tickets: "));
}
