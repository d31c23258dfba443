//! Streaming CSV reader for the parking entry log
//!
//! Provides an iterator over parking entries from an entry-log CSV file,
//! delegating format concerns to the csv_format module. Rows are read and
//! converted one at a time, so memory usage stays constant regardless of
//! file size.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found) are returned from `open()`
//! - Individual row failures are yielded as `Err` variants carrying the
//!   1-based file line number, so callers can skip and log them while
//!   continuing with the rest of the file

use crate::io::csv_format::{convert_entry_record, EntryCsvRecord};
use crate::types::{ParkingEntry, ParkingError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Iterator over entry-log rows
///
/// # Examples
///
/// ```no_run
/// use parkasmart::io::EntryLogReader;
/// use std::path::Path;
///
/// let reader = EntryLogReader::open(Path::new("entries.csv")).unwrap();
/// let entries: Vec<_> = reader.filter_map(Result::ok).collect();
/// println!("loaded {} entries", entries.len());
/// ```
#[derive(Debug)]
pub struct EntryLogReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl EntryLogReader {
    /// Open an entry-log CSV file for streaming iteration
    ///
    /// Fields are trimmed and short rows are tolerated (trailing optional
    /// columns may be missing in hand-edited files).
    ///
    /// # Errors
    ///
    /// File-not-found error when the path does not exist, I/O error for any
    /// other open failure.
    pub fn open(path: &Path) -> Result<Self, ParkingError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ParkingError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ParkingError::from(e)
            }
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for EntryLogReader {
    type Item = Result<ParkingEntry, ParkingError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut rows = self.reader.deserialize::<EntryCsvRecord>();

        let result = match rows.next()? {
            Ok(record) => convert_entry_record(record),
            Err(e) => Err(ParkingError::from(e)),
        };

        self.line_num += 1;
        let line = self.line_num;

        // Stamp the file line onto whichever error came out of the row
        Some(result.map_err(|e| match e {
            ParkingError::Parse { message, .. } => ParkingError::Parse {
                line: Some(line),
                message,
            },
            other => other,
        }))
    }
}
