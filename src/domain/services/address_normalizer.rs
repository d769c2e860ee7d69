//! Address Normalizer Service
//!
//! Turns a raw address (IP literal or domain name) into the numeric address
//! used as the catalogue key.

use crate::domain::errors::NormalizeError;
use crate::domain::ports::NameResolver;
use crate::domain::value_objects::NormalizedAddress;
use async_trait::async_trait;
use regex::Regex;
use std::net::IpAddr;
use std::sync::{Arc, LazyLock};

static DOMAIN_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z0-9][a-z0-9-]{0,61}[a-z0-9]$")
        .expect("domain name pattern is valid")
});

/// One accepted address format.
///
/// Validators are consulted in registry order; the first one whose
/// `is_valid` returns true produces the canonical address.
#[async_trait]
pub trait AddressValidator: Send + Sync {
    /// Format name shown to clients when nothing matches.
    fn name(&self) -> &'static str;

    fn is_valid(&self, address: &str) -> bool;

    /// Convert an address this validator accepted into a numeric address.
    async fn to_canonical_address(&self, address: &str)
        -> Result<NormalizedAddress, NormalizeError>;
}

/// IPv4 and IPv6 literals. Already canonical.
pub struct IpValidator;

#[async_trait]
impl AddressValidator for IpValidator {
    fn name(&self) -> &'static str {
        "IPv4/IPv6 address"
    }

    fn is_valid(&self, address: &str) -> bool {
        address.parse::<IpAddr>().is_ok()
    }

    async fn to_canonical_address(
        &self,
        address: &str,
    ) -> Result<NormalizedAddress, NormalizeError> {
        Ok(NormalizedAddress::new(address))
    }
}

/// Domain names, resolved through a `NameResolver`.
pub struct DomainNameValidator {
    resolver: Arc<dyn NameResolver>,
}

impl DomainNameValidator {
    pub fn new(resolver: Arc<dyn NameResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl AddressValidator for DomainNameValidator {
    fn name(&self) -> &'static str {
        "domain name"
    }

    fn is_valid(&self, address: &str) -> bool {
        DOMAIN_NAME_PATTERN.is_match(&address.to_lowercase())
    }

    async fn to_canonical_address(
        &self,
        address: &str,
    ) -> Result<NormalizedAddress, NormalizeError> {
        let domain = address.to_lowercase();
        match self.resolver.lookup(&domain).await {
            Some(ip) => {
                tracing::debug!("resolved {} -> {}", domain, ip);
                Ok(NormalizedAddress::new(ip.to_string()))
            }
            None => {
                tracing::debug!("could not resolve {}", domain);
                Err(NormalizeError::Unresolvable { domain })
            }
        }
    }
}

/// Ordered registry of address validators.
pub struct AddressNormalizer {
    validators: Vec<Box<dyn AddressValidator>>,
}

impl AddressNormalizer {
    /// Default registry: IP literals first, then domain names.
    pub fn new(resolver: Arc<dyn NameResolver>) -> Self {
        Self::with_validators(vec![
            Box::new(IpValidator),
            Box::new(DomainNameValidator::new(resolver)),
        ])
    }

    /// Build a normalizer from an explicit registry, tried in the given order.
    pub fn with_validators(validators: Vec<Box<dyn AddressValidator>>) -> Self {
        Self { validators }
    }

    /// Names of the accepted formats, in registry order.
    pub fn accepted_formats(&self) -> String {
        self.validators
            .iter()
            .map(|v| v.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Classify, validate and canonicalize an address.
    pub async fn normalize(&self, address: &str) -> Result<NormalizedAddress, NormalizeError> {
        for validator in &self.validators {
            if validator.is_valid(address) {
                return validator.to_canonical_address(address).await;
            }
        }

        Err(NormalizeError::Validation {
            accepted: self.accepted_formats(),
        })
    }
}
