//! Storage ports for tenants and parking entries
//!
//! The services talk to storage through these traits so the backing store is
//! swappable: the in-memory DashMap adapters in [`crate::store`] for this
//! crate, a SQL database behind the same seams in a deployment. Concurrent
//! callers rely entirely on the store's own guarantees (e.g. the plate
//! uniqueness check); the services add no locking of their own.

use crate::types::{
    EntryId, NewTenant, ParkingEntry, ParkingError, PaymentMethod, Tenant, TenantId, TenantUpdate,
};

/// Storage port for tenant records
pub trait TenantStore: Send + Sync {
    /// All tenant records, active and inactive
    fn list(&self) -> Vec<Tenant>;

    /// Insert a new tenant
    ///
    /// # Errors
    ///
    /// Returns a Conflict error when the plate number is already registered;
    /// the existing record is left unchanged.
    fn insert(&self, tenant: NewTenant) -> Result<Tenant, ParkingError>;

    /// Apply a partial update to a tenant
    ///
    /// Returns whether a record with the given id existed. The plate number
    /// is immutable and not part of [`TenantUpdate`].
    fn update(&self, id: TenantId, update: TenantUpdate) -> Result<bool, ParkingError>;

    /// Exact lookup by canonical (uppercase) plate number
    fn find_by_plate(&self, plate: &str) -> Option<Tenant>;

    /// Active tenants whose plate number contains `fragment`
    /// (case-insensitive), up to `limit` matches
    fn search_active(&self, fragment: &str, limit: usize) -> Vec<Tenant>;
}

/// Storage port for parking entries
///
/// Entries are never deleted through any interface; settlement flips
/// `is_paid` (optionally correcting method and amount) and nothing else.
pub trait EntryStore: Send + Sync {
    /// Persist a new entry and return it with its assigned id
    ///
    /// The `id` on the passed record is ignored; the store assigns one.
    fn insert(&self, entry: ParkingEntry) -> ParkingEntry;

    /// Fetch an entry by id
    fn get(&self, id: EntryId) -> Option<ParkingEntry>;

    /// Mark an entry paid, optionally correcting the payment method and
    /// amount recorded at creation
    ///
    /// Returns whether an entry with the given id existed. A miss is not an
    /// error at this layer; the caller decides whether to surface it.
    fn mark_paid(
        &self,
        id: EntryId,
        payment_method: Option<PaymentMethod>,
        amount_paid: Option<i64>,
    ) -> bool;

    /// All entries whose timestamp falls on the given `YYYY-MM-DD` day,
    /// ordered by entry time ascending
    fn entries_on(&self, date: &str) -> Vec<ParkingEntry>;
}
