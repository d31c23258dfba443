//! Business logic components
//!
//! - [`aggregation`] - single-pass daily statistics
//! - [`clock`] - injected time source
//! - [`refcode`] - transaction reference codes
//! - [`traits`] - storage ports
//! - [`notify`] - notification sink, message texts, receipt dispatch
//! - [`entry_service`] - entry/tenant orchestration
//! - [`report_service`] - daily report computation and delivery

pub mod aggregation;
pub mod clock;
pub mod entry_service;
pub mod notify;
pub mod refcode;
pub mod report_service;
pub mod traits;

pub use aggregation::{aggregate_for_date, BuildingStats, DailyStats};
pub use clock::{Clock, FixedClock, SystemClock};
pub use entry_service::{EntryListing, EntryService};
pub use notify::{LogSink, NotificationSink, Receipt, ReceiptDispatcher};
pub use refcode::generate_ref_code;
pub use report_service::{render_full_report, ReportService};
pub use traits::{EntryStore, TenantStore};
