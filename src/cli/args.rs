use clap::Parser;
use std::path::PathBuf;

/// Compute and deliver daily parking reports from an entry log
#[derive(Parser, Debug)]
#[command(name = "parkasmart")]
#[command(about = "Compute daily parking statistics from an entry-log CSV", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing parking entry records
    #[arg(value_name = "INPUT", help = "Path to the entry-log CSV file")]
    pub input_file: PathBuf,

    /// Day to report on instead of today
    #[arg(
        long = "date",
        value_name = "YYYY-MM-DD",
        help = "Report date (default: today)"
    )]
    pub date: Option<String>,

    /// Deliver the reduced summary SMS to the configured manager phone
    #[arg(
        long = "send",
        help = "Send the summary SMS to the MANAGER_PHONE destination"
    )]
    pub send: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::input_only(&["program", "entries.csv"], None, false)]
    #[case::with_date(&["program", "--date", "2026-08-29", "entries.csv"], Some("2026-08-29"), false)]
    #[case::with_send(&["program", "--send", "entries.csv"], None, true)]
    #[case::all_options(
        &["program", "--date", "2026-08-29", "--send", "entries.csv"],
        Some("2026-08-29"),
        true
    )]
    fn test_argument_parsing(
        #[case] args: &[&str],
        #[case] date: Option<&str>,
        #[case] send: bool,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.input_file, PathBuf::from("entries.csv"));
        assert_eq!(parsed.date.as_deref(), date);
        assert_eq!(parsed.send, send);
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::date_without_value(&["program", "--date"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
