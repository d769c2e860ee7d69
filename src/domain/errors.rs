//! Domain Errors
//!
//! Typed failures produced by the catalogue. Each layer has its own error
//! type; `CatalogueError` is what the application service hands to inbound
//! adapters.

/// Failures while turning a raw address into a storage key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// Input matched none of the registered address formats.
    #[error("Address given in wrong format! It should be one of: {accepted}.")]
    Validation { accepted: String },
    /// Input looked like a domain name but resolved to nothing.
    #[error("Could not resolve domain to an address.")]
    Unresolvable { domain: String },
}

/// Failures reported by a geolocation store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Create path found the key already present.
    #[error("geolocation entry for {0} already exists")]
    Conflict(String),
    /// Update path found the key gone.
    #[error("geolocation entry for {0} no longer exists")]
    Missing(String),
    /// Busy/locked database or a dropped handle. Worth retrying.
    #[error("transient store failure: {0}")]
    Transient(String),
    /// Stored document could not be decoded.
    #[error("corrupt geolocation entry for {key}: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("store failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Failures while asking the external provider for geolocation data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Network error or non-2xx status.
    #[error("provider transport error: {0}")]
    Transport(String),
    /// Provider has no data for the address (error code 404).
    #[error("Geolocation info for address not found.")]
    NotFound,
    /// Provider reported a failure we do not map to anything specific.
    #[error("{}", unknown_provider_message(.code))]
    UnknownProvider { code: Option<i64> },
    /// Provider claimed success but the body does not fit the record schema.
    #[error("Internal error related to address geolocation resolving process.")]
    InternalConsistency(String),
}

fn unknown_provider_message(code: &Option<i64>) -> String {
    match code {
        Some(code) => format!(
            "Internal error related to address geolocation resolving process - error code {}",
            code
        ),
        None => "Unknown error during address geolocation resolving process.".to_string(),
    }
}

impl ProviderError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Outcome of a failed catalogue operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueError {
    #[error(transparent)]
    Address(#[from] NormalizeError),
    /// No entry exists and none could be fetched.
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Message for a cache miss with no provider configured.
pub const GEOLOCATION_NOT_FOUND: &str = "Geolocation for address not found.";
/// Message for deleting an address that has no entry.
pub const ENTRY_NOT_FOUND: &str = "Geolocation for given address not found.";
