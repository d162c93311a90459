//! GeoIP lookup using a locally stored MaxMind GeoLite2 City database.
//!
//! [`GeoLiteService`] owns everything the lookup and update paths share: the
//! database path, the decoder, the HTTP client and the read/write lock that
//! keeps readers from ever opening the file while it is being swapped.

mod classify;
mod decoder;
mod lookup;
mod types;
mod update;

// Re-export public API
pub use classify::{LocalRanges, INTERNAL_NETWORK, LAN, LOCALHOST, TAILSCALE};
pub use decoder::{GeoDatabase, GeoDecoder, MaxMindDecoder};
pub use types::{DatabaseRecord, Location};

use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::config::GeoLiteConfig;

/// Geo-lookup database service.
///
/// Construct one per process and share it (e.g. behind an `Arc`) between
/// request handlers calling [`lookup`](Self::lookup) and the scheduler calling
/// [`update_database`](Self::update_database).
pub struct GeoLiteService {
    config: GeoLiteConfig,
    client: reqwest::Client,
    decoder: Arc<dyn GeoDecoder>,
    local_ranges: LocalRanges,
    disable_updater: bool,
    // Guards the database path: shared for open+decode, exclusive for the install rename
    db_lock: Arc<RwLock<()>>,
}

impl GeoLiteService {
    /// Creates a service that decodes MaxMind `.mmdb` files.
    pub fn new(config: GeoLiteConfig, client: reqwest::Client) -> Self {
        Self::with_decoder(config, client, Arc::new(MaxMindDecoder))
    }

    /// Creates a service with a custom database decoder.
    ///
    /// An invalid local IPv6 range setting never fails construction: it is
    /// logged as a warning and no local IPv6 ranges are used.
    pub fn with_decoder(
        config: GeoLiteConfig,
        client: reqwest::Client,
        decoder: Arc<dyn GeoDecoder>,
    ) -> Self {
        let disable_updater = config.license_key.is_empty() && config.uses_default_url();
        if disable_updater {
            log::warn!(
                "MAXMIND_LICENSE_KEY is empty: the GeoLite2 City database won't be updated"
            );
        }

        let local_ranges = match LocalRanges::parse(&config.local_ipv6_ranges) {
            Ok(ranges) => {
                if !ranges.is_empty() {
                    log::info!("Initialized IPv6 local ranges: {}", ranges.len());
                }
                ranges
            }
            Err(e) => {
                log::warn!("Failed to initialize IPv6 local ranges: {}", e);
                LocalRanges::default()
            }
        };

        Self {
            config,
            client,
            decoder,
            local_ranges,
            disable_updater,
            db_lock: Arc::new(RwLock::new(())),
        }
    }

    /// Returns `true` when periodic updates should not be scheduled
    /// (no license key for the default MaxMind download URL).
    pub fn updater_disabled(&self) -> bool {
        self.disable_updater
    }

    /// Path of the installed database file.
    pub fn database_path(&self) -> &Path {
        &self.config.db_path
    }

    /// Age of the installed database file, or `None` if it does not exist.
    pub fn database_age(&self) -> Option<Duration> {
        update::database_age(&self.config.db_path)
    }

    /// The local IPv6 ranges in effect.
    pub fn local_ranges(&self) -> &LocalRanges {
        &self.local_ranges
    }
}
