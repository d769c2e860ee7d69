//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical numeric address used as the storage key.
///
/// Only the address normalizer produces these, so holding one means the
/// string is a valid IPv4 or IPv6 literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedAddress(String);

impl NormalizedAddress {
    pub(crate) fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address family tag carried by a geolocation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Ipv4,
    Ipv6,
}

/// Two-letter continent code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContinentCode {
    #[serde(rename = "AF")]
    Africa,
    #[serde(rename = "AS")]
    Asia,
    #[serde(rename = "EU")]
    Europe,
    #[serde(rename = "NA")]
    NorthAmerica,
    #[serde(rename = "OC")]
    Oceania,
    #[serde(rename = "SA")]
    SouthAmerica,
    #[serde(rename = "AN")]
    Antarctica,
}

impl ContinentCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Africa => "AF",
            Self::Asia => "AS",
            Self::Europe => "EU",
            Self::NorthAmerica => "NA",
            Self::Oceania => "OC",
            Self::SouthAmerica => "SA",
            Self::Antarctica => "AN",
        }
    }

    /// The continent name that must accompany this code.
    pub fn name(&self) -> ContinentName {
        match self {
            Self::Africa => ContinentName::Africa,
            Self::Asia => ContinentName::Asia,
            Self::Europe => ContinentName::Europe,
            Self::NorthAmerica => ContinentName::NorthAmerica,
            Self::Oceania => ContinentName::Oceania,
            Self::SouthAmerica => ContinentName::SouthAmerica,
            Self::Antarctica => ContinentName::Antarctica,
        }
    }
}

/// Human-readable continent name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContinentName {
    Africa,
    Asia,
    Europe,
    #[serde(rename = "North America")]
    NorthAmerica,
    Oceania,
    #[serde(rename = "South America")]
    SouthAmerica,
    Antarctica,
}

impl ContinentName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::NorthAmerica => "North America",
            Self::Oceania => "Oceania",
            Self::SouthAmerica => "South America",
            Self::Antarctica => "Antarctica",
        }
    }
}

/// ISO 3166-1 alpha-2 country code (exactly two characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.chars().count() == 2 {
            Ok(Self(value))
        } else {
            Err(format!(
                "country_code must be exactly 2 characters, got {:?}",
                value
            ))
        }
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continent_code_serde_names() {
        let tests = vec![
            (ContinentCode::Africa, "\"AF\""),
            (ContinentCode::Asia, "\"AS\""),
            (ContinentCode::Europe, "\"EU\""),
            (ContinentCode::NorthAmerica, "\"NA\""),
            (ContinentCode::Oceania, "\"OC\""),
            (ContinentCode::SouthAmerica, "\"SA\""),
            (ContinentCode::Antarctica, "\"AN\""),
        ];

        for (code, json) in tests {
            assert_eq!(serde_json::to_string(&code).unwrap(), json);
            assert_eq!(format!("\"{}\"", code.as_str()), json);
        }
    }

    #[test]
    fn test_continent_code_name_pairs() {
        assert_eq!(ContinentCode::NorthAmerica.name(), ContinentName::NorthAmerica);
        assert_eq!(ContinentCode::NorthAmerica.name().as_str(), "North America");
        assert_eq!(ContinentCode::SouthAmerica.name().as_str(), "South America");
        assert_eq!(ContinentCode::Antarctica.name().as_str(), "Antarctica");
    }

    #[test]
    fn test_continent_name_deserializes_spaced_names() {
        let name: ContinentName = serde_json::from_str("\"North America\"").unwrap();
        assert_eq!(name, ContinentName::NorthAmerica);

        assert!(serde_json::from_str::<ContinentName>("\"NorthAmerica\"").is_err());
    }

    #[test]
    fn test_unknown_continent_code_rejected() {
        assert!(serde_json::from_str::<ContinentCode>("\"XX\"").is_err());
        assert!(serde_json::from_str::<ContinentCode>("\"na\"").is_err());
    }

    #[test]
    fn test_address_type_lowercase() {
        assert_eq!(serde_json::to_string(&AddressType::Ipv4).unwrap(), "\"ipv4\"");
        let ty: AddressType = serde_json::from_str("\"ipv6\"").unwrap();
        assert_eq!(ty, AddressType::Ipv6);
        assert!(serde_json::from_str::<AddressType>("\"IPv6\"").is_err());
    }

    #[test]
    fn test_country_code_length() {
        assert!(CountryCode::try_from("US".to_string()).is_ok());
        assert!(CountryCode::try_from("U".to_string()).is_err());
        assert!(CountryCode::try_from("USA".to_string()).is_err());
        assert!(CountryCode::try_from(String::new()).is_err());
    }

    #[test]
    fn test_country_code_serde() {
        let code: CountryCode = serde_json::from_str("\"PL\"").unwrap();
        assert_eq!(code.as_str(), "PL");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"PL\"");
        assert!(serde_json::from_str::<CountryCode>("\"POL\"").is_err());
    }

    #[test]
    fn test_normalized_address_display() {
        let addr = NormalizedAddress::new("216.58.209.14");
        assert_eq!(addr.as_str(), "216.58.209.14");
        assert_eq!(addr.to_string(), "216.58.209.14");
    }
}
