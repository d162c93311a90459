//! Database decoders.
//!
//! Lookups and the update pipeline's validation step both go through
//! [`GeoDecoder`], so a staged file is accepted only if it opens exactly the
//! way a lookup would open it.

use std::net::IpAddr;
use std::path::Path;

use maxminddb::{geoip2, Reader};

use super::types::DatabaseRecord;
use crate::error_handling::DecodeError;

/// Opens database files.
pub trait GeoDecoder: Send + Sync {
    /// Opens and validates the database at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn GeoDatabase>, DecodeError>;
}

/// An opened database. Dropping it closes the file.
pub trait GeoDatabase {
    /// Looks up `ip`; `Ok(None)` means the database has no record for it.
    fn lookup(&self, ip: IpAddr) -> Result<Option<DatabaseRecord>, DecodeError>;
}

/// Decoder for MaxMind GeoLite2/GeoIP2 City `.mmdb` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxMindDecoder;

impl GeoDecoder for MaxMindDecoder {
    fn open(&self, path: &Path) -> Result<Box<dyn GeoDatabase>, DecodeError> {
        let reader = Reader::open_readfile(path).map_err(|e| DecodeError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::trace!(
            "Opened GeoIP database {} (build {})",
            path.display(),
            reader.metadata.build_epoch
        );
        Ok(Box::new(MaxMindDatabase { reader }))
    }
}

struct MaxMindDatabase {
    reader: Reader<Vec<u8>>,
}

impl GeoDatabase for MaxMindDatabase {
    fn lookup(&self, ip: IpAddr) -> Result<Option<DatabaseRecord>, DecodeError> {
        // maxminddb 0.27 API: lookup() returns Result<LookupResult, MaxMindDbError>
        let result = self
            .reader
            .lookup(ip)
            .map_err(|e| DecodeError::Lookup(e.to_string()))?;

        if !result.has_data() {
            return Ok(None);
        }

        let city: Option<geoip2::City> = result
            .decode()
            .map_err(|e| DecodeError::Lookup(e.to_string()))?;

        Ok(city.map(|city| DatabaseRecord {
            country: city.country.names.english.map(|s| s.to_string()),
            city: city.city.names.english.map(|s| s.to_string()),
        }))
    }
}
