//! Entry and tenant orchestration
//!
//! The entry service ties the plate validator, the reference code generator,
//! and the storage ports together: tenant autocomplete lookup, entry
//! creation (with the fire-and-forget receipt side effect), payment marking,
//! the today-scoped filtered listing, and the admin tenant CRUD operations.
//!
//! Validation and conflict errors are detected and reported synchronously;
//! receipt delivery never blocks or fails entry creation.

use crate::core::clock::Clock;
use crate::core::notify::{Receipt, ReceiptDispatcher};
use crate::core::refcode::generate_ref_code;
use crate::core::traits::{EntryStore, TenantStore};
use crate::types::{
    EntryFilter, EntryId, EntryInput, NewTenant, ParkingEntry, ParkingError, PaymentMethod,
    Tenant, TenantId, TenantUpdate, DEFAULT_MONTHLY_RATE,
};
use std::sync::Arc;
use tracing::debug;

/// Maximum tenant matches returned by the autocomplete lookup
const LOOKUP_LIMIT: usize = 5;

/// Minimum query length before the autocomplete lookup runs
const LOOKUP_MIN_CHARS: usize = 2;

/// Result of the today-scoped entry listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryListing {
    /// Matching entries, newest first
    pub entries: Vec<ParkingEntry>,
    /// Number of matching entries
    pub total_vehicles: u64,
    /// Sum of `amount_paid` over the matching entries
    pub total_collected: i64,
}

/// Orchestrates entry creation, payment marking, and tenant lookup
pub struct EntryService<T, E, C>
where
    T: TenantStore,
    E: EntryStore,
    C: Clock,
{
    tenants: Arc<T>,
    entries: Arc<E>,
    clock: Arc<C>,
    receipts: Option<ReceiptDispatcher>,
}

impl<T, E, C> EntryService<T, E, C>
where
    T: TenantStore,
    E: EntryStore,
    C: Clock,
{
    /// Create a service with no receipt dispatch (receipts silently skipped)
    pub fn new(tenants: Arc<T>, entries: Arc<E>, clock: Arc<C>) -> Self {
        EntryService {
            tenants,
            entries,
            clock,
            receipts: None,
        }
    }

    /// Attach the receipt dispatcher for the fire-and-forget receipt path
    pub fn with_receipts(mut self, receipts: ReceiptDispatcher) -> Self {
        self.receipts = Some(receipts);
        self
    }

    /// Autocomplete lookup: active tenants whose plate contains the query
    ///
    /// Returns empty immediately for queries shorter than two characters;
    /// otherwise up to five matches, case-insensitive.
    pub fn lookup_by_plate(&self, query: &str) -> Vec<Tenant> {
        let query = query.trim();
        if query.len() < LOOKUP_MIN_CHARS {
            return Vec::new();
        }
        self.tenants
            .search_active(&query.to_uppercase(), LOOKUP_LIMIT)
    }

    /// Exact tenant lookup by plate (uppercase-normalized)
    pub fn find_tenant(&self, plate: &str) -> Option<Tenant> {
        self.tenants.find_by_plate(&plate.trim().to_uppercase())
    }

    /// Create a parking entry
    ///
    /// Normalizes the plate to uppercase, generates the reference code and
    /// entry timestamp, defaults `is_paid` to true, persists the record, and
    /// (when a phone number is present) queues a receipt without waiting for
    /// delivery.
    ///
    /// # Errors
    ///
    /// Returns a Validation error when `plate_number`, `tenant_type`,
    /// `payment_method`, or `amount_paid` is missing, or when the amount is
    /// negative. Nothing is persisted on error.
    pub fn create_entry(&self, input: EntryInput) -> Result<ParkingEntry, ParkingError> {
        let plate = input.plate_number.trim().to_uppercase();
        if plate.is_empty() {
            return Err(ParkingError::missing_field("plate_number"));
        }
        let tenant_type = input
            .tenant_type
            .ok_or_else(|| ParkingError::missing_field("tenant_type"))?;
        let payment_method = input
            .payment_method
            .ok_or_else(|| ParkingError::missing_field("payment_method"))?;
        let amount_paid = input
            .amount_paid
            .ok_or_else(|| ParkingError::missing_field("amount_paid"))?;
        if amount_paid < 0 {
            return Err(ParkingError::invalid_field(
                "amount_paid",
                "amount must not be negative",
            ));
        }

        let reference_code = generate_ref_code(self.clock.as_ref());
        let entry_time = self.clock.now_iso();

        let entry = self.entries.insert(ParkingEntry {
            id: 0,
            plate_number: plate.clone(),
            driver_name: input.driver_name,
            phone: input.phone,
            shop_number: input.shop_number,
            building: input.building,
            tenant_type,
            payment_method,
            amount_paid,
            is_paid: input.is_paid.unwrap_or(true),
            entry_time,
            reference_code,
        });

        // Fire-and-forget receipt: queued, never awaited, failures logged
        // by the worker only
        if let (Some(receipts), Some(phone)) = (&self.receipts, entry.phone.as_deref()) {
            if !phone.is_empty() {
                receipts.dispatch(Receipt {
                    phone: phone.to_string(),
                    plate: entry.plate_number.clone(),
                    amount: entry.amount_paid,
                    method: entry.payment_method,
                    building: entry
                        .building
                        .clone()
                        .unwrap_or_else(|| "N/A".to_string()),
                    ref_code: entry.reference_code.clone(),
                });
            }
        }

        Ok(entry)
    }

    /// Mark an entry as paid, optionally correcting method and amount
    ///
    /// A missing id is a no-op, not an error: flaky mobile clients retry
    /// this call and the second attempt must not fail. The return value
    /// reports whether an entry was actually updated.
    pub fn mark_paid(
        &self,
        id: EntryId,
        payment_method: Option<PaymentMethod>,
        amount_paid: Option<i64>,
    ) -> Result<bool, ParkingError> {
        if let Some(amount) = amount_paid {
            if amount < 0 {
                return Err(ParkingError::invalid_field(
                    "amount_paid",
                    "amount must not be negative",
                ));
            }
        }
        let updated = self.entries.mark_paid(id, payment_method, amount_paid);
        if !updated {
            debug!(id, "mark_paid on unknown entry id, no-op");
        }
        Ok(updated)
    }

    /// All of today's entries, unfiltered, ascending by entry time
    pub fn entries_today(&self) -> Vec<ParkingEntry> {
        self.entries.entries_on(&self.clock.today())
    }

    /// First unpaid entry for the given plate today, if any
    pub fn first_unpaid_today(&self, plate: &str) -> Option<ParkingEntry> {
        let plate = plate.trim().to_uppercase();
        self.entries_today()
            .into_iter()
            .find(|e| e.plate_number == plate && !e.is_paid)
    }

    /// Today's entries with optional filters, newest first
    ///
    /// Filters are conjunctive: building and enum filters match exactly,
    /// the free-text search matches the plate number (uppercased) or the
    /// driver name as a substring.
    pub fn list_today(&self, filter: &EntryFilter) -> EntryListing {
        let mut entries: Vec<ParkingEntry> = self
            .entries_today()
            .into_iter()
            .filter(|e| {
                if let Some(building) = &filter.building {
                    if e.building.as_deref() != Some(building.as_str()) {
                        return false;
                    }
                }
                if let Some(tenant_type) = filter.tenant_type {
                    if e.tenant_type != tenant_type {
                        return false;
                    }
                }
                if let Some(method) = filter.payment_method {
                    if e.payment_method != method {
                        return false;
                    }
                }
                if let Some(search) = &filter.search {
                    // Case-insensitive on both fields, like a SQL LIKE
                    let plate_hit = e.plate_number.contains(&search.to_uppercase());
                    let name_hit = e.driver_name.as_deref().is_some_and(|name| {
                        name.to_lowercase().contains(&search.to_lowercase())
                    });
                    if !plate_hit && !name_hit {
                        return false;
                    }
                }
                true
            })
            .collect();

        // ISO-8601 timestamps sort lexicographically
        entries.sort_by(|a, b| b.entry_time.cmp(&a.entry_time));

        let total_collected = entries.iter().map(|e| e.amount_paid).sum();
        EntryListing {
            total_vehicles: entries.len() as u64,
            total_collected,
            entries,
        }
    }

    // Admin tenant CRUD

    /// All tenant records
    pub fn list_tenants(&self) -> Vec<Tenant> {
        self.tenants.list()
    }

    /// Register a tenant
    ///
    /// Normalizes the plate to uppercase and defaults the monthly rate.
    ///
    /// # Errors
    ///
    /// Returns a Validation error when plate, name, or building is empty and
    /// a Conflict error when the plate is already registered; the existing
    /// record is left unchanged.
    pub fn register_tenant(&self, mut tenant: NewTenant) -> Result<Tenant, ParkingError> {
        tenant.plate_number = tenant.plate_number.trim().to_uppercase();
        if tenant.plate_number.is_empty() {
            return Err(ParkingError::missing_field("plate_number"));
        }
        if tenant.name.trim().is_empty() {
            return Err(ParkingError::missing_field("name"));
        }
        if tenant.building.trim().is_empty() {
            return Err(ParkingError::missing_field("building"));
        }
        tenant.monthly_rate = Some(tenant.monthly_rate.unwrap_or(DEFAULT_MONTHLY_RATE));

        self.tenants.insert(tenant)
    }

    /// Partially update a tenant by id
    ///
    /// Returns whether the tenant existed; the plate number cannot change.
    pub fn update_tenant(
        &self,
        id: TenantId,
        update: TenantUpdate,
    ) -> Result<bool, ParkingError> {
        self.tenants.update(id, update)
    }
}
