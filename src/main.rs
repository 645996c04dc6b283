//! Interactive ticket booking menu over `events.json` in the working directory.

use std::io;
use ticketbook::{EventStore, cli};
use tracing_subscriber::EnvFilter;

const EVENTS_FILE: &str = "events.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout belongs to the menu; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut store = EventStore::open(EVENTS_FILE)?;
    cli::run(&mut store, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
