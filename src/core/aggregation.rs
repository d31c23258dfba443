//! Daily statistics aggregation
//!
//! Computes the per-day report figures from a collection of parking entries
//! in a single pass: totals, per-tenant-type counts and revenue,
//! per-payment-method totals, paid/unpaid counts, and a per-building
//! breakdown.
//!
//! # Determinism
//!
//! Every figure is an independent sum or count, so the output is identical
//! for any permutation of the same input set. The building breakdown is
//! accumulated in a `BTreeMap` and emitted in building-name order for the
//! same reason.
//!
//! # Date scoping
//!
//! Entries are scoped to a single calendar day by comparing the `YYYY-MM-DD`
//! prefix of their timestamp with the target date. An entry whose stored
//! timestamp does not begin with a valid date prefix is excluded, never
//! errored; a malformed row in the log must not take the report down.

use crate::types::{ParkingEntry, PaymentMethod, TenantType};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-building count and revenue for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildingStats {
    pub building: String,
    pub count: u64,
    pub total: i64,
}

/// Full statistics for one calendar day
///
/// Empty input yields all zeros and an empty building breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    /// The day the statistics cover, `YYYY-MM-DD`
    pub date: String,

    /// Total vehicle count for the day
    pub total_vehicles: u64,

    pub tenant_count: u64,
    pub tenant_revenue: i64,
    pub non_tenant_count: u64,
    pub non_tenant_revenue: i64,
    pub motorcycle_count: u64,
    pub motorcycle_revenue: i64,

    pub cash_total: i64,
    pub mpesa_total: i64,

    /// Sum of `amount_paid` across all of the day's entries
    pub grand_total: i64,

    pub paid_count: u64,
    pub unpaid_count: u64,

    /// Count and revenue for every distinct non-empty building value,
    /// in building-name order
    pub building_breakdown: Vec<BuildingStats>,
}

/// Extract the calendar-date prefix of a stored entry timestamp
///
/// Returns the first ten characters when they parse as a `YYYY-MM-DD` date,
/// `None` otherwise. This is the one place report correctness depends on the
/// timestamp format.
pub fn entry_date(entry_time: &str) -> Option<&str> {
    let prefix = entry_time.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    Some(prefix)
}

/// Whether an entry's timestamp falls on the given calendar day
pub fn is_on_date(entry: &ParkingEntry, date: &str) -> bool {
    entry_date(&entry.entry_time) == Some(date)
}

/// Aggregate daily statistics for `date` over the given entries
///
/// Entries on other days (or with malformed timestamps) are skipped; the
/// rest are folded in a single pass.
pub fn aggregate_for_date<'a, I>(entries: I, date: &str) -> DailyStats
where
    I: IntoIterator<Item = &'a ParkingEntry>,
{
    let mut stats = DailyStats {
        date: date.to_string(),
        ..DailyStats::default()
    };
    let mut buildings: BTreeMap<String, (u64, i64)> = BTreeMap::new();

    for entry in entries {
        if !is_on_date(entry, date) {
            continue;
        }

        stats.total_vehicles += 1;
        stats.grand_total += entry.amount_paid;

        match entry.tenant_type {
            TenantType::Tenant => {
                stats.tenant_count += 1;
                stats.tenant_revenue += entry.amount_paid;
            }
            TenantType::NonTenant => {
                stats.non_tenant_count += 1;
                stats.non_tenant_revenue += entry.amount_paid;
            }
            TenantType::Motorcycle => {
                stats.motorcycle_count += 1;
                stats.motorcycle_revenue += entry.amount_paid;
            }
        }

        match entry.payment_method {
            PaymentMethod::Cash => stats.cash_total += entry.amount_paid,
            PaymentMethod::Mpesa => stats.mpesa_total += entry.amount_paid,
        }

        if entry.is_paid {
            stats.paid_count += 1;
        } else {
            stats.unpaid_count += 1;
        }

        if let Some(building) = entry.building.as_deref().filter(|b| !b.is_empty()) {
            let slot = buildings.entry(building.to_string()).or_insert((0, 0));
            slot.0 += 1;
            slot.1 += entry.amount_paid;
        }
    }

    stats.building_breakdown = buildings
        .into_iter()
        .map(|(building, (count, total))| BuildingStats {
            building,
            count,
            total,
        })
        .collect();

    stats
}
