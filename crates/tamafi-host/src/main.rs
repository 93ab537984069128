//! Headless device host for the TamaFi pet.
//!
//! Runs the behaviour engine the way the handheld's firmware does, minus
//! the screen and radio: a fixed-cadence tick loop, a synthetic Wi-Fi
//! scanner answering scan requests, and a JSON file standing in for flash
//! storage. Every engine event is logged.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `tamafi-config.yaml` (or `TAMAFI_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the engine, seeded or from entropy
//! 4. Restore the stored creature, or create and store one on first boot
//! 5. Build the synthetic scanner
//! 6. Run the loop in real or virtual time
//! 7. Save and log the result

mod error;
mod runner;
mod scanner;
mod store;

use std::path::PathBuf;

use tamafi_core::{LoggingConfig, PetEngine, TamafiConfig};
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::HostError;
use crate::runner::{Host, uptime};
use crate::scanner::SyntheticScanner;
use crate::store::JsonFileStore;

/// Config file used when `TAMAFI_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "tamafi-config.yaml";

/// Application entry point for the host.
///
/// # Errors
///
/// Returns an error if configuration, storage, or logging setup fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let origin = Instant::now();

    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!("tamafi-host starting");
    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }

    // 3. Build the engine.
    let seed = config.host.seed;
    let mut engine = match seed {
        Some(seed) => PetEngine::seeded(config.engine.clone(), seed)?,
        None => PetEngine::from_entropy(config.engine.clone())?,
    };
    info!(
        seed = ?seed,
        tick_interval_ms = config.host.tick_interval_ms,
        realtime = config.host.realtime,
        autonomous = config.host.autonomous,
        "Engine ready"
    );

    // 4. Restore or create the creature.
    let mut store = JsonFileStore::new(&config.host.state_path);
    let boot_at = uptime(origin);
    let boot = engine.boot(&mut store, boot_at)?;
    info!(
        path = %store.path().display(),
        first_boot = boot.first_boot,
        hatched = boot.hatched,
        stage = %boot.state.stage(),
        "Creature loaded"
    );

    // 5. Scanner, on its own stream so scan results do not shift engine draws.
    let scanner = SyntheticScanner::from_config(&config.host, seed.map(|s| s.wrapping_add(1)));

    // 6. Run.
    let mut host = Host::new(engine, boot, store, scanner, config.host.clone(), boot_at);
    let summary = if config.host.realtime {
        host.run_realtime(origin, shutdown_signal()).await?
    } else {
        host.run_virtual(boot_at)?
    };

    // 7. Log the result.
    let stats = host.state().stats();
    info!(
        end_reason = ?summary.end_reason,
        ticks = summary.totals.ticks,
        saves = summary.totals.saves,
        deaths = summary.totals.deaths,
        scans = summary.totals.scans_requested,
        state_path = %host.store().path().display(),
        hatched = host.hatched(),
        stage = %summary.stage,
        hunger = stats.hunger(),
        happiness = stats.happiness(),
        health = stats.health(),
        "tamafi-host shutdown complete"
    );

    Ok(())
}

/// Load configuration from `TAMAFI_CONFIG` or the default path.
///
/// A missing file yields defaults (with environment overrides applied).
fn load_config() -> Result<(TamafiConfig, Option<PathBuf>), HostError> {
    let path = std::env::var_os("TAMAFI_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = TamafiConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        Ok((TamafiConfig::parse("")?, None))
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logging(config: &LoggingConfig) -> Result<(), HostError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| HostError::Logging {
        message: e.to_string(),
    })
}

/// Resolves on Ctrl-C. If the handler cannot be installed the run only
/// ends at `max_ticks`.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
}
