//! System Name Resolver
//!
//! Implements NameResolver with the operating system's resolver
//! (getaddrinfo, via tokio's blocking pool).

use crate::domain::ports::NameResolver;
use async_trait::async_trait;
use std::net::IpAddr;

/// OS-backed forward resolver. IPv4 answers are preferred.
#[derive(Debug, Default, Clone)]
pub struct SystemNameResolver;

impl SystemNameResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NameResolver for SystemNameResolver {
    async fn lookup(&self, domain: &str) -> Option<IpAddr> {
        let addrs: Vec<IpAddr> = match tokio::net::lookup_host((domain, 0)).await {
            Ok(addrs) => addrs.map(|sa| sa.ip()).collect(),
            Err(e) => {
                tracing::debug!("lookup of {} failed: {}", domain, e);
                return None;
            }
        };

        addrs
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
    }
}
