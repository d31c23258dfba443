//! Parking entry types
//!
//! This module defines the parking entry record and the enums used on its
//! wire representation. An entry is a single parking transaction for a given
//! day; its plate number is denormalized (no foreign key to a tenant) because
//! walk-in vehicles and motorcycles have no tenant record at all.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Parking entry identifier
///
/// Assigned by the entry store at insert time.
pub type EntryId = i64;

/// Classification of the vehicle being logged
///
/// Tenants have a pre-registered record with a standing monthly rate;
/// everything else is charged the walk-in default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenantType {
    /// Pre-registered vehicle with a monthly rate
    #[serde(rename = "tenant")]
    Tenant,

    /// Walk-in vehicle with no tenant record
    #[serde(rename = "non-tenant")]
    NonTenant,

    /// Motorcycle (boda), tracked separately in daily reports
    #[serde(rename = "motorcycle")]
    Motorcycle,
}

impl fmt::Display for TenantType {
    /// Wire name, matching the serde representation
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TenantType::Tenant => "tenant",
            TenantType::NonTenant => "non-tenant",
            TenantType::Motorcycle => "motorcycle",
        };
        f.write_str(name)
    }
}

/// How the parking fee was (or will be) settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Mpesa,
}

impl PaymentMethod {
    /// Human-readable label used in SMS receipts and USSD confirmations
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Mpesa => "M-Pesa",
        }
    }
}

impl fmt::Display for PaymentMethod {
    /// Wire name, matching the serde representation
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Mpesa => "mpesa",
        };
        f.write_str(name)
    }
}

/// A single parking transaction record
///
/// Invariants:
/// - `amount_paid` is non-negative (Kenyan shillings, whole units)
/// - `reference_code` is issued exactly once at creation and never regenerated
/// - `entry_time` is an ISO-8601 timestamp and is immutable after creation
/// - only `is_paid` (plus payment method/amount on settlement) is mutated
///   after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingEntry {
    /// Store-assigned identifier
    pub id: EntryId,

    /// Vehicle plate in canonical uppercase form (e.g. "KDA 456B")
    ///
    /// Denormalized: may or may not match a registered tenant's plate.
    pub plate_number: String,

    /// Driver name if captured ("Walk-in" for USSD non-tenant entries)
    pub driver_name: Option<String>,

    /// Phone number for the SMS receipt, if any
    pub phone: Option<String>,

    /// Shop number of the associated tenant, if any
    pub shop_number: Option<String>,

    /// Building the vehicle parked at, if known
    pub building: Option<String>,

    /// Vehicle classification
    pub tenant_type: TenantType,

    /// Settlement method
    pub payment_method: PaymentMethod,

    /// Amount paid in whole shillings (non-negative)
    pub amount_paid: i64,

    /// Whether the fee has been settled
    pub is_paid: bool,

    /// ISO-8601 entry timestamp, set from the injected clock at creation
    pub entry_time: String,

    /// Generated transaction reference code (e.g. "PS-MBCX41K2-7QH3")
    pub reference_code: String,
}

/// Input for creating a parking entry
///
/// The fields the entry API requires are `Option`s here so that their absence
/// can be rejected with a field-level validation error rather than a parse
/// failure. `is_paid` defaults to `true` when omitted (front-desk staff log
/// most entries at the moment of payment).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryInput {
    pub plate_number: String,
    pub driver_name: Option<String>,
    pub phone: Option<String>,
    pub shop_number: Option<String>,
    pub building: Option<String>,
    pub tenant_type: Option<TenantType>,
    pub payment_method: Option<PaymentMethod>,
    pub amount_paid: Option<i64>,
    pub is_paid: Option<bool>,
}

/// Optional filters for the today-scoped entry listing
///
/// All filters are conjunctive. `search` matches the plate number
/// (uppercased) or the driver name as a substring.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub building: Option<String>,
    pub tenant_type: Option<TenantType>,
    pub payment_method: Option<PaymentMethod>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::tenant(TenantType::Tenant, "\"tenant\"")]
    #[case::non_tenant(TenantType::NonTenant, "\"non-tenant\"")]
    #[case::motorcycle(TenantType::Motorcycle, "\"motorcycle\"")]
    fn test_tenant_type_wire_names(#[case] value: TenantType, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&value).unwrap(), expected);
    }

    #[rstest]
    #[case::cash(PaymentMethod::Cash, "Cash")]
    #[case::mpesa(PaymentMethod::Mpesa, "M-Pesa")]
    fn test_payment_method_labels(#[case] method: PaymentMethod, #[case] expected: &str) {
        assert_eq!(method.label(), expected);
    }
}
