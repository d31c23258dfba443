//! ParkaSmart Core Library
//! # Overview
//!
//! This library provides the core of a mall parking management system:
//! vehicle entry logging, tenant lookup, payment settlement, daily
//! statistics, SMS receipts and reports, and a USSD menu for feature phones.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (ParkingEntry, Tenant, etc.)
//! - [`plate`] - Kenyan plate validation and the slot-based input model
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::entry_service`] - Entry and tenant orchestration
//!   - [`core::report_service`] - Daily report computation and delivery
//!   - [`core::aggregation`] - Single-pass daily statistics
//!   - [`core::notify`] - Notification sink and the receipt dispatch queue
//! - [`store`] - In-memory store adapters behind the storage ports
//! - [`io`] - Entry-log CSV input and output
//! - [`ussd`] - Stateless USSD menu state machine
//!
//! # Vehicle Classifications
//!
//! Entries are recorded under three classifications:
//!
//! - **Tenant**: Pre-registered vehicle charged its standing monthly rate
//! - **Non-tenant**: Walk-in vehicle charged the flat default rate
//! - **Motorcycle**: Boda traffic, tracked separately in daily reports
//!
//! # Daily Statistics
//!
//! Each day's entries reduce to:
//! - counts and revenue per classification
//! - cash vs M-Pesa totals and the grand total
//! - paid vs unpaid counts
//! - a per-building breakdown

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod plate;
pub mod store;
pub mod types;
pub mod ussd;

pub use core::{
    aggregate_for_date, generate_ref_code, render_full_report, Clock, DailyStats, EntryService,
    EntryStore, ReportService, SystemClock, TenantStore,
};
pub use io::EntryLogReader;
pub use plate::{format_plate_number, is_partially_valid_plate, is_valid_plate_number};
pub use types::{
    EntryId, EntryInput, ParkingEntry, ParkingError, PaymentMethod, Tenant, TenantId, TenantType,
};
pub use ussd::{UssdRequest, UssdResponse, UssdRouter};
