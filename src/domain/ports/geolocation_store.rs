//! Geolocation Store Port
//!
//! Defines the interface for persisting catalogue entries.
//! Implementations may use SQLite, PostgreSQL, or in-memory storage.

use crate::domain::entities::{CatalogueEntry, GeolocationRecord};
use crate::domain::errors::StoreError;
use crate::domain::value_objects::NormalizedAddress;
use async_trait::async_trait;

/// Key-value store of geolocation records keyed by normalized address.
///
/// This is an outbound port. Every write commits before returning, and
/// implementations retry transient backend failures on their own, so a
/// `StoreError::Transient` seen by a caller means the retry budget is spent.
#[async_trait]
pub trait GeolocationStore: Send + Sync {
    /// Look up the entry for an address.
    async fn get(&self, key: &NormalizedAddress) -> Result<Option<CatalogueEntry>, StoreError>;

    /// Create a new entry.
    ///
    /// Fails with `StoreError::Conflict` if the key already exists.
    async fn put(
        &self,
        key: &NormalizedAddress,
        record: GeolocationRecord,
    ) -> Result<CatalogueEntry, StoreError>;

    /// Replace the record of an existing entry (full replace, no merge).
    ///
    /// Fails with `StoreError::Missing` if the entry was removed since it was read.
    async fn update(
        &self,
        entry: &CatalogueEntry,
        record: GeolocationRecord,
    ) -> Result<CatalogueEntry, StoreError>;

    /// Remove an entry.
    async fn delete(&self, entry: &CatalogueEntry) -> Result<(), StoreError>;
}
