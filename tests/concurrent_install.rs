//! Concurrency test: lookups running while a new database is installed.
//!
//! Readers hammer the service from plain threads while the update pipeline
//! replaces a large database. Every lookup must succeed and see either the old
//! or the new file, never a partially written one.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use geolite_service::GeoLiteService;
use httptest::{matchers::*, responders::*, Expectation, Server};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

#[path = "helpers.rs"]
mod helpers;

use helpers::{geolite_archive, set_age, test_config, text_database, TextDecoder};

const READER_THREADS: usize = 4;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_lookups_during_install_never_fail() {
    let old_database = text_database(&[("8.8.8.8", "Oldland", "Oldcity")], 20_000);
    let new_database = text_database(&[("8.8.8.8", "Newland", "Newcity")], 200_000);

    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/geolite.tar.gz"))
            .times(1)
            .respond_with(status_code(200).body(geolite_archive(&new_database))),
    );

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("GeoLite2-City.mmdb");
    std::fs::write(&db_path, &old_database).expect("Failed to write database");
    set_age(&db_path, Duration::from_secs(30 * 24 * 60 * 60));

    let decoder = Arc::new(TextDecoder::default());
    let service = Arc::new(GeoLiteService::with_decoder(
        test_config(
            db_path.clone(),
            format!("{}?license_key=%s", server.url("/geolite.tar.gz")),
        ),
        reqwest::Client::new(),
        decoder.clone(),
    ));

    let stop = Arc::new(AtomicBool::new(false));
    let lookups = Arc::new(AtomicUsize::new(0));
    let readers: Vec<_> = (0..READER_THREADS)
        .map(|_| {
            let service = Arc::clone(&service);
            let stop = Arc::clone(&stop);
            let lookups = Arc::clone(&lookups);
            std::thread::spawn(move || -> Result<(), String> {
                loop {
                    let location = service
                        .lookup("8.8.8.8")
                        .map_err(|e| format!("lookup failed mid-install: {}", e))?;
                    if location.country != "Oldland" && location.country != "Newland" {
                        return Err(format!("unexpected location {:?}", location));
                    }
                    lookups.fetch_add(1, Ordering::SeqCst);
                    if stop.load(Ordering::SeqCst) {
                        return Ok(());
                    }
                }
            })
        })
        .collect();

    service
        .update_database(&CancellationToken::new())
        .await
        .expect("update should succeed");

    stop.store(true, Ordering::SeqCst);
    for reader in readers {
        reader
            .join()
            .expect("reader thread panicked")
            .expect("reader observed a failure");
    }

    assert!(lookups.load(Ordering::SeqCst) >= READER_THREADS);
    assert!(decoder.open_count() >= READER_THREADS);
    assert_eq!(std::fs::read(&db_path).unwrap(), new_database);

    let location = service.lookup("8.8.8.8").unwrap();
    assert_eq!(location.country, "Newland");
    assert_eq!(location.city, "Newcity");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_updates_install_one_complete_file() {
    let new_database = text_database(&[("8.8.8.8", "Newland", "Newcity")], 50_000);

    let server = Server::run();
    // Both runs pass the freshness check before either installs
    server.expect(
        Expectation::matching(request::method_path("GET", "/geolite.tar.gz"))
            .times(2)
            .respond_with(status_code(200).body(geolite_archive(&new_database))),
    );

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("GeoLite2-City.mmdb");
    let service = Arc::new(GeoLiteService::with_decoder(
        test_config(
            db_path.clone(),
            format!("{}?license_key=%s", server.url("/geolite.tar.gz")),
        ),
        reqwest::Client::new(),
        Arc::new(TextDecoder::default()),
    ));

    let cancel = CancellationToken::new();
    let (first, second) = tokio::join!(
        service.update_database(&cancel),
        service.update_database(&cancel)
    );
    first.expect("first update should succeed");
    second.expect("second update should succeed");

    assert_eq!(std::fs::read(&db_path).unwrap(), new_database);
    assert!(helpers::staging_leftovers(temp_dir.path()).is_empty());
}
