//! Catalogue Service - Main application use case
//!
//! Implements the cache-aside protocol: the store is consulted first and
//! the external provider only on a miss, with the result written back.
//! This is the primary interface for the inbound adapter.

use crate::domain::entities::{CatalogueEntry, GeolocationRecord};
use crate::domain::errors::{
    CatalogueError, ProviderError, StoreError, ENTRY_NOT_FOUND, GEOLOCATION_NOT_FOUND,
};
use crate::domain::ports::{GeolocationProvider, GeolocationStore};
use crate::domain::services::AddressNormalizer;
use crate::domain::value_objects::NormalizedAddress;
use std::sync::Arc;
use std::time::Duration;

/// Default upper bound on one provider resolution, retries included.
pub const DEFAULT_PROVIDER_DEADLINE: Duration = Duration::from_secs(30);

/// Catalogue service - read, write and delete geolocation entries.
///
/// Holds no per-address state; every call re-reads the store.
/// When no provider is configured a cache miss is simply a not-found.
pub struct CatalogueService {
    normalizer: AddressNormalizer,
    store: Arc<dyn GeolocationStore>,
    provider: Option<Arc<dyn GeolocationProvider>>,
    provider_deadline: Duration,
}

impl CatalogueService {
    pub fn new(
        normalizer: AddressNormalizer,
        store: Arc<dyn GeolocationStore>,
        provider: Option<Arc<dyn GeolocationProvider>>,
    ) -> Self {
        Self {
            normalizer,
            store,
            provider,
            provider_deadline: DEFAULT_PROVIDER_DEADLINE,
        }
    }

    /// Bound the time a cache miss may spend waiting on the provider.
    pub fn with_provider_deadline(mut self, deadline: Duration) -> Self {
        self.provider_deadline = deadline;
        self
    }

    pub fn provider_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Look up an address, fetching and caching it from the provider on a miss.
    pub async fn get_geolocation(&self, address: &str) -> Result<CatalogueEntry, CatalogueError> {
        let key = self.normalizer.normalize(address).await?;

        if let Some(entry) = self.store.get(&key).await? {
            tracing::debug!("catalogue hit for {}", key);
            return Ok(entry);
        }

        let Some(provider) = &self.provider else {
            tracing::debug!("catalogue miss for {} and no provider configured", key);
            return Err(CatalogueError::NotFound(GEOLOCATION_NOT_FOUND));
        };

        tracing::debug!("catalogue miss for {}, asking provider", key);
        let record = self.resolve_within_deadline(provider.as_ref(), &key).await?;

        match self.store.put(&key, record.clone()).await {
            Ok(entry) => Ok(entry),
            Err(StoreError::Conflict(_)) => {
                // someone else cached it between our read and write
                tracing::debug!("lost create race for {}, re-reading", key);
                match self.store.get(&key).await? {
                    Some(entry) => Ok(entry),
                    None => {
                        tracing::debug!("{} vanished after create race, writing again", key);
                        Ok(self.store.put(&key, record).await?)
                    }
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve_within_deadline(
        &self,
        provider: &dyn GeolocationProvider,
        key: &NormalizedAddress,
    ) -> Result<GeolocationRecord, ProviderError> {
        match tokio::time::timeout(self.provider_deadline, provider.resolve(key)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Transport(format!(
                "no provider answer for {} within {:?}",
                key, self.provider_deadline
            ))),
        }
    }

    /// Create or fully replace the entry for an address.
    pub async fn put_geolocation(
        &self,
        address: &str,
        record: GeolocationRecord,
    ) -> Result<CatalogueEntry, CatalogueError> {
        let key = self.normalizer.normalize(address).await?;

        let entry = match self.store.get(&key).await? {
            Some(existing) => self.replace(&key, &existing, record).await?,
            None => match self.store.put(&key, record.clone()).await {
                Ok(entry) => entry,
                Err(StoreError::Conflict(_)) => {
                    tracing::debug!("concurrent create for {}, updating instead", key);
                    match self.store.get(&key).await? {
                        Some(existing) => self.replace(&key, &existing, record).await?,
                        None => self.store.put(&key, record).await?,
                    }
                }
                Err(e) => return Err(e.into()),
            },
        };

        tracing::info!("stored geolocation for {}", key);
        Ok(entry)
    }

    async fn replace(
        &self,
        key: &NormalizedAddress,
        existing: &CatalogueEntry,
        record: GeolocationRecord,
    ) -> Result<CatalogueEntry, StoreError> {
        match self.store.update(existing, record.clone()).await {
            Err(StoreError::Missing(_)) => {
                tracing::debug!("{} deleted during update, recreating", key);
                self.store.put(key, record).await
            }
            other => other,
        }
    }

    /// Remove the entry for an address.
    pub async fn delete_geolocation(&self, address: &str) -> Result<(), CatalogueError> {
        let key = self.normalizer.normalize(address).await?;

        let entry = self
            .store
            .get(&key)
            .await?
            .ok_or(CatalogueError::NotFound(ENTRY_NOT_FOUND))?;

        self.store.delete(&entry).await?;
        tracing::info!("deleted geolocation for {}", key);
        Ok(())
    }
}
