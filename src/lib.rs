//! geo-catalogue Library
//!
//! This module exposes the catalogue components for use in integration tests
//! and as a library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::CatalogueService;
pub use config::load_config;
pub use domain::entities::{CatalogueEntry, GeolocationRecord};
pub use domain::errors::{CatalogueError, NormalizeError, ProviderError, StoreError};
pub use domain::ports::{GeolocationProvider, GeolocationStore, NameResolver};
pub use domain::services::AddressNormalizer;
pub use domain::value_objects::NormalizedAddress;
pub use infrastructure::RetryPolicy;
