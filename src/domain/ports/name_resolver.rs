//! Name Resolver Port
//!
//! Defines the interface for resolving domain names to IP addresses.

use async_trait::async_trait;
use std::net::IpAddr;

/// Forward name resolution.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Resolve a domain name to an address.
    ///
    /// Returns None if the name cannot be resolved.
    async fn lookup(&self, domain: &str) -> Option<IpAddr>;
}
