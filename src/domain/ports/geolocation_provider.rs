//! Geolocation Provider Port
//!
//! Defines the interface for fetching geolocation data from an external service.

use crate::domain::entities::GeolocationRecord;
use crate::domain::errors::ProviderError;
use crate::domain::value_objects::NormalizedAddress;
use async_trait::async_trait;

/// External source of geolocation records.
///
/// Implementations hit the network on every call; nothing is memoized.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Fetch the geolocation record for an address.
    async fn resolve(&self, address: &NormalizedAddress) -> Result<GeolocationRecord, ProviderError>;
}
