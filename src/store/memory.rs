//! In-memory store adapters
//!
//! DashMap-backed implementations of the storage ports, used by the CLI, the
//! tests, and any deployment that keeps the day's state in process. DashMap's
//! internal sharding makes the stores safe to share behind an `Arc` across
//! request handlers without additional locking; plate uniqueness is enforced
//! atomically through a dedicated plate index.

use crate::core::aggregation::entry_date;
use crate::core::traits::{EntryStore, TenantStore};
use crate::types::{
    EntryId, NewTenant, ParkingEntry, ParkingError, PaymentMethod, Tenant, TenantId, TenantUpdate,
    DEFAULT_MONTHLY_RATE,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Thread-safe in-memory tenant store
///
/// Tenants are keyed by id; a secondary plate index backs the uniqueness
/// constraint and the exact-plate lookup. Soft delete only: records never
/// leave the map, deactivation goes through `is_active`.
pub struct MemoryTenantStore {
    tenants: DashMap<TenantId, Tenant>,

    /// Canonical plate -> tenant id, claimed atomically on insert
    plate_index: DashMap<String, TenantId>,

    next_id: AtomicI64,
}

impl MemoryTenantStore {
    /// Create an empty tenant store
    pub fn new() -> Self {
        MemoryTenantStore {
            tenants: DashMap::new(),
            plate_index: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryTenantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TenantStore for MemoryTenantStore {
    fn list(&self) -> Vec<Tenant> {
        let mut tenants: Vec<Tenant> =
            self.tenants.iter().map(|t| t.value().clone()).collect();
        tenants.sort_by_key(|t| t.id);
        tenants
    }

    fn insert(&self, tenant: NewTenant) -> Result<Tenant, ParkingError> {
        let plate = tenant.plate_number.trim().to_uppercase();

        // Claiming the plate slot first makes the uniqueness check and the
        // reservation a single atomic step under DashMap's shard lock
        match self.plate_index.entry(plate.clone()) {
            Entry::Occupied(_) => Err(ParkingError::duplicate_plate(&plate)),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let record = Tenant {
                    id,
                    plate_number: plate,
                    name: tenant.name,
                    phone: tenant.phone,
                    shop_number: tenant.shop_number,
                    floor_code: tenant.floor_code,
                    building: tenant.building,
                    monthly_rate: tenant.monthly_rate.unwrap_or(DEFAULT_MONTHLY_RATE),
                    is_active: true,
                };
                slot.insert(id);
                self.tenants.insert(id, record.clone());
                Ok(record)
            }
        }
    }

    fn update(&self, id: TenantId, update: TenantUpdate) -> Result<bool, ParkingError> {
        match self.tenants.get_mut(&id) {
            Some(mut tenant) => {
                if let Some(name) = update.name {
                    tenant.name = name;
                }
                if let Some(phone) = update.phone {
                    tenant.phone = Some(phone);
                }
                if let Some(shop_number) = update.shop_number {
                    tenant.shop_number = Some(shop_number);
                }
                if let Some(floor_code) = update.floor_code {
                    tenant.floor_code = Some(floor_code);
                }
                if let Some(building) = update.building {
                    tenant.building = building;
                }
                if let Some(monthly_rate) = update.monthly_rate {
                    tenant.monthly_rate = monthly_rate;
                }
                if let Some(is_active) = update.is_active {
                    tenant.is_active = is_active;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn find_by_plate(&self, plate: &str) -> Option<Tenant> {
        let id = *self.plate_index.get(plate)?;
        self.tenants.get(&id).map(|t| t.value().clone())
    }

    fn search_active(&self, fragment: &str, limit: usize) -> Vec<Tenant> {
        let fragment = fragment.to_uppercase();
        let mut matches: Vec<Tenant> = self
            .tenants
            .iter()
            .filter(|t| t.is_active && t.plate_number.contains(&fragment))
            .map(|t| t.value().clone())
            .collect();
        // Sorted before truncation so the cut is deterministic
        matches.sort_by_key(|t| t.id);
        matches.truncate(limit);
        matches
    }
}

/// Thread-safe in-memory parking entry store
///
/// Entries are keyed by their assigned id and are never removed; settlement
/// mutates `is_paid` (and optionally method/amount) in place.
pub struct MemoryEntryStore {
    entries: DashMap<EntryId, ParkingEntry>,
    next_id: AtomicI64,
}

impl MemoryEntryStore {
    /// Create an empty entry store
    pub fn new() -> Self {
        MemoryEntryStore {
            entries: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for MemoryEntryStore {
    fn insert(&self, mut entry: ParkingEntry) -> ParkingEntry {
        entry.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(entry.id, entry.clone());
        entry
    }

    fn get(&self, id: EntryId) -> Option<ParkingEntry> {
        self.entries.get(&id).map(|e| e.value().clone())
    }

    fn mark_paid(
        &self,
        id: EntryId,
        payment_method: Option<PaymentMethod>,
        amount_paid: Option<i64>,
    ) -> bool {
        match self.entries.get_mut(&id) {
            Some(mut entry) => {
                entry.is_paid = true;
                if let Some(method) = payment_method {
                    entry.payment_method = method;
                }
                if let Some(amount) = amount_paid {
                    entry.amount_paid = amount;
                }
                true
            }
            None => false,
        }
    }

    fn entries_on(&self, date: &str) -> Vec<ParkingEntry> {
        let mut entries: Vec<ParkingEntry> = self
            .entries
            .iter()
            .filter(|e| entry_date(&e.entry_time) == Some(date))
            .map(|e| e.value().clone())
            .collect();
        entries.sort_by(|a, b| a.entry_time.cmp(&b.entry_time).then(a.id.cmp(&b.id)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TenantType;
    use rstest::rstest;

    fn new_tenant(plate: &str) -> NewTenant {
        NewTenant {
            plate_number: plate.to_string(),
            name: "Mary".to_string(),
            phone: Some("+254700000001".to_string()),
            shop_number: Some("S12".to_string()),
            floor_code: None,
            building: "Sunrise Mall".to_string(),
            monthly_rate: None,
        }
    }

    fn new_entry(plate: &str, entry_time: &str) -> ParkingEntry {
        ParkingEntry {
            id: 0,
            plate_number: plate.to_string(),
            driver_name: None,
            phone: None,
            shop_number: None,
            building: None,
            tenant_type: TenantType::NonTenant,
            payment_method: PaymentMethod::Cash,
            amount_paid: 300,
            is_paid: false,
            entry_time: entry_time.to_string(),
            reference_code: "PS-TEST-0001".to_string(),
        }
    }

    #[test]
    fn test_tenant_insert_assigns_ids_and_normalizes_plate() {
        let store = MemoryTenantStore::new();
        let a = store.insert(new_tenant("kda 456b")).unwrap();
        let b = store.insert(new_tenant("KBZ 123A")).unwrap();

        assert_eq!(a.plate_number, "KDA 456B");
        assert!(a.is_active);
        assert_eq!(a.monthly_rate, DEFAULT_MONTHLY_RATE);
        assert!(b.id > a.id);
    }

    #[rstest]
    #[case::same_case("KDA 456B")]
    #[case::different_case("kda 456b")]
    fn test_tenant_duplicate_plate_is_conflict(#[case] duplicate: &str) {
        let store = MemoryTenantStore::new();
        store.insert(new_tenant("KDA 456B")).unwrap();

        let err = store.insert(new_tenant(duplicate)).unwrap_err();
        assert!(matches!(err, ParkingError::Conflict { .. }));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_tenant_update_is_partial_and_reports_existence() {
        let store = MemoryTenantStore::new();
        let tenant = store.insert(new_tenant("KDA 456B")).unwrap();

        let updated = store
            .update(
                tenant.id,
                TenantUpdate {
                    monthly_rate: Some(500),
                    is_active: Some(false),
                    ..TenantUpdate::default()
                },
            )
            .unwrap();
        assert!(updated);

        let stored = store.find_by_plate("KDA 456B").unwrap();
        assert_eq!(stored.monthly_rate, 500);
        assert!(!stored.is_active);
        // Untouched fields survive
        assert_eq!(stored.name, "Mary");

        assert!(!store.update(999, TenantUpdate::default()).unwrap());
    }

    #[test]
    fn test_search_active_filters_and_limits() {
        let store = MemoryTenantStore::new();
        for i in 0..8 {
            store.insert(new_tenant(&format!("KDA 20{}A", i))).unwrap();
        }
        let inactive = store.insert(new_tenant("KDA 299A")).unwrap();
        store
            .update(
                inactive.id,
                TenantUpdate {
                    is_active: Some(false),
                    ..TenantUpdate::default()
                },
            )
            .unwrap();

        let matches = store.search_active("KDA 20", 5);
        assert_eq!(matches.len(), 5);
        assert!(matches.windows(2).all(|w| w[0].id < w[1].id));
        assert!(store.search_active("KDA 299", 5).is_empty());
        assert!(store.search_active("ZZZ", 5).is_empty());
    }

    #[test]
    fn test_entry_insert_assigns_ids() {
        let store = MemoryEntryStore::new();
        let a = store.insert(new_entry("KDA 456B", "2026-08-29T08:00:00.000Z"));
        let b = store.insert(new_entry("KBZ 123A", "2026-08-29T09:00:00.000Z"));
        assert!(a.id > 0);
        assert!(b.id > a.id);
        assert_eq!(store.get(a.id).unwrap().plate_number, "KDA 456B");
    }

    #[test]
    fn test_mark_paid_mutates_only_settlement_fields() {
        let store = MemoryEntryStore::new();
        let entry = store.insert(new_entry("KDA 456B", "2026-08-29T08:00:00.000Z"));

        assert!(store.mark_paid(entry.id, Some(PaymentMethod::Mpesa), None));
        let stored = store.get(entry.id).unwrap();
        assert!(stored.is_paid);
        assert_eq!(stored.payment_method, PaymentMethod::Mpesa);
        assert_eq!(stored.amount_paid, 300);
        assert_eq!(stored.entry_time, entry.entry_time);
        assert_eq!(stored.reference_code, entry.reference_code);

        assert!(!store.mark_paid(999, None, None));
    }

    #[test]
    fn test_entries_on_scopes_and_orders() {
        let store = MemoryEntryStore::new();
        store.insert(new_entry("KAA 111A", "2026-08-29T10:00:00.000Z"));
        store.insert(new_entry("KBB 222B", "2026-08-29T08:00:00.000Z"));
        store.insert(new_entry("KCC 333C", "2026-08-30T08:00:00.000Z"));
        store.insert(new_entry("KDD 444D", "garbage"));

        let today = store.entries_on("2026-08-29");
        assert_eq!(today.len(), 2);
        assert_eq!(today[0].plate_number, "KBB 222B");
        assert_eq!(today[1].plate_number, "KAA 111A");
    }
}
