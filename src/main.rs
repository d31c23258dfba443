//! ParkaSmart CLI
//!
//! Command-line interface for computing daily parking reports from an
//! entry-log CSV file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- entries.csv
//! cargo run -- --date 2026-08-29 entries.csv
//! MANAGER_PHONE=+254700000009 cargo run -- --send entries.csv
//! ```
//!
//! The program reads parking entries from the input CSV file, aggregates the
//! requested day (today by default), and prints the full report to stdout.
//! With `--send` it also delivers the reduced summary SMS to the destination
//! configured in the `MANAGER_PHONE` environment variable.
//!
//! Malformed rows are skipped with a warning; a missing input file or an
//! invalid `--date` is fatal.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, delivery failure, etc.)

use chrono::NaiveDate;
use parkasmart::cli;
use parkasmart::core::{render_full_report, Clock, LogSink, ReportService, SystemClock};
use parkasmart::io::EntryLogReader;
use parkasmart::store::MemoryEntryStore;
use parkasmart::types::ParkingEntry;
use parkasmart::{aggregate_for_date, EntryStore};
use std::process;
use std::sync::Arc;
use tracing::warn;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let clock = SystemClock;
    let date = match &args.date {
        Some(date) => {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                eprintln!("Error: invalid date '{}', expected YYYY-MM-DD", date);
                process::exit(1);
            }
            date.clone()
        }
        None => clock.today(),
    };

    let reader = match EntryLogReader::open(&args.input_file) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut entries: Vec<ParkingEntry> = Vec::new();
    let mut skipped = 0usize;
    for result in reader {
        match result {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!(error = %e, "skipping malformed entry row");
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        warn!(skipped, "some entry rows were skipped");
    }

    let stats = aggregate_for_date(&entries, &date);
    println!("{}", render_full_report(&stats));

    if args.send {
        // The SMS path always covers today, regardless of --date
        if date != clock.today() {
            warn!(date = %date, "--send delivers today's summary, not the --date day");
        }

        let store = Arc::new(MemoryEntryStore::new());
        for entry in entries {
            store.insert(entry);
        }

        let service = ReportService::new(
            store,
            Arc::new(LogSink),
            Arc::new(clock),
            std::env::var("MANAGER_PHONE").ok(),
        );
        if let Err(e) = service.send_daily_report() {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
