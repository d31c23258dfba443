//! Injected time source
//!
//! "Today" decides which entries a report covers, so core logic never reads
//! the wall clock directly. Production code injects [`SystemClock`]; tests
//! inject [`FixedClock`] to pin the date.

use chrono::{DateTime, SecondsFormat, Utc};

/// Time source for entry timestamps and date scoping
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current instant as an ISO-8601 string with millisecond precision,
    /// the storage format for entry timestamps (e.g.
    /// `2026-08-29T10:15:00.000Z`)
    fn now_iso(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Today's calendar date as `YYYY-MM-DD`
    fn today(&self) -> String {
        self.now().format("%Y-%m-%d").to_string()
    }
}

/// Wall-clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a single instant
///
/// Used by tests to make "today" deterministic.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Pin the clock to the given RFC 3339 instant
    ///
    /// # Panics
    ///
    /// Panics when the string is not a valid RFC 3339 timestamp; the instant
    /// is always a literal in test code.
    pub fn at(rfc3339: &str) -> Self {
        FixedClock(
            DateTime::parse_from_rfc3339(rfc3339)
                .expect("FixedClock::at requires a valid RFC 3339 timestamp")
                .with_timezone(&Utc),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
