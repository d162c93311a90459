//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geolite_service` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use geolite_service::config::{Command, Opt};
use geolite_service::initialization::{init_client, init_logger_with};
use geolite_service::GeoLiteService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting MAXMIND_LICENSE_KEY in .env without exporting it manually
    if dotenvy::dotenv().is_err() {
        // If .env not found in current dir, try next to the executable
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let client = init_client().context("Failed to initialize HTTP client")?;
    let service = Arc::new(GeoLiteService::new(opt.geolite_config(), client));

    let succeeded = match opt.command {
        Command::Lookup { ips } => lookup(service, ips).await?,
        Command::Update => update(&service).await,
        Command::Status => {
            status(&service);
            true
        }
    };

    if !succeeded {
        process::exit(1);
    }
    Ok(())
}

/// Prints `ip<TAB>country<TAB>city` per address; returns `false` if any lookup failed.
async fn lookup(service: Arc<GeoLiteService>, ips: Vec<String>) -> Result<bool> {
    let results = tokio::task::spawn_blocking(move || {
        ips.into_iter()
            .map(|ip| {
                let result = service.lookup(&ip);
                (ip, result)
            })
            .collect::<Vec<_>>()
    })
    .await
    .context("Lookup task failed")?;

    let mut all_ok = true;
    for (ip, result) in results {
        match result {
            Ok(location) => println!("{}\t{}\t{}", ip, location.country, location.city),
            Err(e) => {
                all_ok = false;
                eprintln!("{}\terror: {}", ip, e);
            }
        }
    }
    Ok(all_ok)
}

async fn update(service: &GeoLiteService) -> bool {
    if service.updater_disabled() {
        log::warn!("Updater disabled: set MAXMIND_LICENSE_KEY or GEOLITE_DB_URL to enable it");
        return true;
    }

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling update");
            cancel_on_signal.cancel();
        }
    });

    match service.update_database(&cancel).await {
        Ok(()) => true,
        Err(e) => {
            eprintln!("geolite_service error: {}", e);
            false
        }
    }
}

fn status(service: &GeoLiteService) {
    let path = service.database_path();
    println!("Database: {}", path.display());
    match service.database_age() {
        Some(age) => {
            println!("Exists: yes");
            println!("Age: {:.1} days", age.as_secs_f64() / 86_400.0);
        }
        None => println!("Exists: no"),
    }
    println!(
        "Updater: {}",
        if service.updater_disabled() {
            "disabled (no license key)"
        } else {
            "enabled"
        }
    );
}
