//! GeoIP data structures.
//!
//! This module defines the data structures returned by lookups and decoders.

/// Country and city for an IP address.
///
/// Either a synthetic internal-network pair, a pair decoded from the database,
/// or two empty strings when nothing is known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Country name (English), or the internal-network label
    pub country: String,
    /// City name (English), or the internal-network kind ("LAN", "Tailscale", "localhost")
    pub city: String,
}

impl Location {
    /// Creates a location from a country and city.
    pub fn new(country: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            city: city.into(),
        }
    }

    /// Returns `true` when neither country nor city is known.
    pub fn is_empty(&self) -> bool {
        self.country.is_empty() && self.city.is_empty()
    }
}

/// Record decoded from the database for a single address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseRecord {
    /// English country name, if the database has one
    pub country: Option<String>,
    /// English city name, if the database has one
    pub city: Option<String>,
}

impl From<DatabaseRecord> for Location {
    fn from(record: DatabaseRecord) -> Self {
        Self {
            country: record.country.unwrap_or_default(),
            city: record.city.unwrap_or_default(),
        }
    }
}
