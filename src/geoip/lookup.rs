//! IP address lookup.

use std::net::IpAddr;
use std::sync::PoisonError;

use super::types::Location;
use super::GeoLiteService;
use crate::error_handling::GeoLiteError;

impl GeoLiteService {
    /// Returns the country and city of the given IP address.
    ///
    /// - empty input returns an empty [`Location`] (no address is not an error)
    /// - internal addresses return their synthetic label without touching the database
    /// - addresses missing from the database return an empty [`Location`]
    ///
    /// The database file is opened fresh for every call, so a lookup always
    /// sees the most recently installed file. This does blocking file I/O;
    /// async callers should use `tokio::task::spawn_blocking`.
    ///
    /// # Errors
    ///
    /// - [`GeoLiteError::InvalidAddress`] if `ip_address` is not an IP address
    /// - [`GeoLiteError::Database`] if the database cannot be opened or decoded
    pub fn lookup(&self, ip_address: &str) -> Result<Location, GeoLiteError> {
        if ip_address.is_empty() {
            return Ok(Location::default());
        }

        let ip: IpAddr = ip_address
            .parse()
            .map_err(|_| GeoLiteError::InvalidAddress(ip_address.to_string()))?;

        if let Some(location) = self.local_ranges.classify(ip) {
            return Ok(location);
        }

        // The guard outlives the opened database, so the handle is closed before
        // an installer can take the exclusive lock.
        let _guard = self.db_lock.read().unwrap_or_else(PoisonError::into_inner);

        let database = self
            .decoder
            .open(&self.config.db_path)
            .map_err(GeoLiteError::Database)?;
        let record = database.lookup(ip).map_err(GeoLiteError::Database)?;

        log::trace!("GeoIP lookup for {}: {:?}", ip, record);

        Ok(record.map(Location::from).unwrap_or_default())
    }
}
