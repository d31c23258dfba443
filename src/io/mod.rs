//! Entry-log file input and output

pub mod csv_format;
pub mod entry_reader;

pub use csv_format::{convert_entry_record, write_entries_csv, EntryCsvRecord};
pub use entry_reader::EntryLogReader;
