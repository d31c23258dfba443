//! Tenant types
//!
//! A tenant is a pre-registered vehicle/owner record with a standing monthly
//! rate. Tenants are soft-deleted via the `is_active` flag rather than
//! removed, and their plate number is immutable once set.

use serde::{Deserialize, Serialize};

/// Tenant identifier, assigned by the tenant store at insert time
pub type TenantId = i64;

/// Default monthly parking rate in shillings for tenants created without an
/// explicit rate, and the walk-in charge for non-tenants.
pub const DEFAULT_MONTHLY_RATE: i64 = 300;

/// A registered tenant record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Store-assigned identifier
    pub id: TenantId,

    /// Vehicle plate in canonical uppercase form; unique across tenants and
    /// immutable once set
    pub plate_number: String,

    /// Owner name
    pub name: String,

    /// Phone number for receipts, if on file
    pub phone: Option<String>,

    /// Shop number within the building, if any
    pub shop_number: Option<String>,

    /// Floor code within the building, if any
    pub floor_code: Option<String>,

    /// Building the tenant's shop is in
    pub building: String,

    /// Standing monthly parking rate in shillings
    pub monthly_rate: i64,

    /// Soft-delete flag: inactive tenants are excluded from plate lookup
    pub is_active: bool,
}

/// Input for registering a tenant
///
/// `monthly_rate` falls back to [`DEFAULT_MONTHLY_RATE`] when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTenant {
    pub plate_number: String,
    pub name: String,
    pub phone: Option<String>,
    pub shop_number: Option<String>,
    pub floor_code: Option<String>,
    pub building: String,
    pub monthly_rate: Option<i64>,
}

/// Partial update for a tenant record
///
/// Every field is optional; `None` leaves the stored value untouched. The
/// plate number is deliberately absent, it cannot be changed after creation.
/// Deactivation (soft delete) goes through `is_active`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub shop_number: Option<String>,
    pub floor_code: Option<String>,
    pub building: Option<String>,
    pub monthly_rate: Option<i64>,
    pub is_active: Option<bool>,
}
