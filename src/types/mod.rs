//! Core data types for the parking engine
//!
//! Re-exports the tenant and entry records, the wire enums, and the
//! crate-wide error type.

pub mod entry;
pub mod error;
pub mod tenant;

pub use entry::{EntryFilter, EntryId, EntryInput, ParkingEntry, PaymentMethod, TenantType};
pub use error::ParkingError;
pub use tenant::{NewTenant, Tenant, TenantId, TenantUpdate, DEFAULT_MONTHLY_RATE};
