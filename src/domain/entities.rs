//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the geolocation catalogue.
//! They have no external dependencies beyond serde.

use crate::domain::value_objects::{AddressType, ContinentCode, ContinentName, CountryCode};
use serde::{Deserialize, Serialize};

/// Geolocation attributes describing where an address is located.
///
/// Deserialization enforces that `continent_code` and `continent_name`
/// describe the same continent, so a record built from JSON is always
/// consistent. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeolocationRecord")]
pub struct GeolocationRecord {
    /// Hostname the address was looked up for, if any
    pub hostname: Option<String>,
    /// Address family (ipv4, ipv6)
    #[serde(rename = "type")]
    pub address_type: AddressType,
    pub continent_code: ContinentCode,
    pub continent_name: ContinentName,
    /// Country code (ISO 3166-1 alpha-2: US, PL, etc)
    pub country_code: CountryCode,
    pub country_name: String,
    pub region_code: String,
    pub region_name: String,
    pub city: String,
    /// Postal code
    pub zip: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
struct RawGeolocationRecord {
    #[serde(default)]
    hostname: Option<String>,
    #[serde(rename = "type")]
    address_type: AddressType,
    continent_code: ContinentCode,
    continent_name: ContinentName,
    country_code: CountryCode,
    country_name: String,
    region_code: String,
    region_name: String,
    city: String,
    zip: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeolocationRecord> for GeolocationRecord {
    type Error = String;

    fn try_from(raw: RawGeolocationRecord) -> Result<Self, Self::Error> {
        if raw.continent_code.name() != raw.continent_name {
            return Err(format!(
                "continent_name {:?} does not match continent_code {:?}",
                raw.continent_name.as_str(),
                raw.continent_code.as_str()
            ));
        }

        Ok(Self {
            hostname: raw.hostname,
            address_type: raw.address_type,
            continent_code: raw.continent_code,
            continent_name: raw.continent_name,
            country_code: raw.country_code,
            country_name: raw.country_name,
            region_code: raw.region_code,
            region_name: raw.region_name,
            city: raw.city,
            zip: raw.zip,
            latitude: raw.latitude,
            longitude: raw.longitude,
        })
    }
}

/// A persisted (address, geolocation) pair.
///
/// `ip` is the normalized address and the primary key of the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub ip: String,
    pub geolocation: GeolocationRecord,
}

impl CatalogueEntry {
    pub fn new(ip: impl Into<String>, geolocation: GeolocationRecord) -> Self {
        Self {
            ip: ip.into(),
            geolocation,
        }
    }
}
