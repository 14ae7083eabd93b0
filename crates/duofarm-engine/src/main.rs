//! Farm host binary for Duofarm.
//!
//! Hosts one room's farm: restores it from disk, keeps its health current
//! on a fixed cadence, and saves it on the way out.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `duofarm-config.yaml` (or `DUOFARM_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Restore the room's record and farm from the JSON store
//! 4. Gift the starter animal to a brand-new room, if configured
//! 5. Run the refresh loop until Ctrl-C
//! 6. Save the farm and log the result

mod error;
mod persist_callback;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use duofarm_core::config::LoggingConfig;
use duofarm_core::{Clock, DuofarmConfig, FarmSession, JsonFileStore, SystemClock, run_refresh_loop};
use duofarm_types::{RoomId, RoomRecord};
use tokio::sync::{Mutex, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::persist_callback::PersistCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "duofarm-config.yaml";

/// Application entry point for the farm host.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration. Logging is not up yet, so remember what
    //    happened and report it below.
    let config_path = config_path();
    let (config, found) = load_config(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("duofarm-engine starting");
    if found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }

    // 3. Restore the room's farm.
    let clock = SystemClock;
    let room_id = config.room.room_id.unwrap_or_else(|| {
        let id = RoomId::new();
        warn!(room_id = %id, "No room id configured; farm will not be found again after exit");
        id
    });
    let started_at = config.room.started_at.unwrap_or_else(|| clock.now());
    let store = Arc::new(JsonFileStore::new(&config.storage.data_dir));
    info!(
        %room_id,
        %started_at,
        data_dir = %store.dir().display(),
        starting_points = config.room.starting_points,
        "Opening room"
    );

    // Config only describes a room the store has never seen.
    let defaults = RoomRecord::new(room_id, started_at, clock.now(), config.room.starting_points);
    let mut session = FarmSession::load(store.as_ref(), defaults, clock).map_err(EngineError::from)?;

    // 4. Gift the starter animal.
    if let Some(species) = config.room.starter_species {
        if !session.is_initialized() {
            let animal_id = session.gift_animal(species);
            info!(%animal_id, %species, "Starter animal gifted");
            session.save(store.as_ref()).map_err(EngineError::from)?;
        }
    }

    // 5. Run the refresh loop until Ctrl-C.
    let shared = Arc::new(Mutex::new(session));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(wait_for_ctrl_c(shutdown_tx));

    let mut callback = PersistCallback::new(Arc::clone(&store), config.refresh.save_every);
    let interval = Duration::from_secs(config.refresh.interval_secs);
    let result = run_refresh_loop(&shared, interval, shutdown_rx, &mut callback).await;
    callback.flush().await;

    // 6. Save and log.
    let session = shared.lock().await;
    let snapshot = session.snapshot();
    let overview = session.overview();
    drop(session);

    let balance = snapshot.room.points_balance;
    let saved = tokio::task::spawn_blocking(move || snapshot.save_to(store.as_ref()))
        .await
        .context("final save task")?
        .map_err(EngineError::from)
        .context("final save")?;

    info!(
        refreshes = result.refreshes,
        final_status = %result.final_status,
        health_percentage = overview.health_percentage(),
        balance,
        saved,
        save_failures = callback.failures(),
        "duofarm-engine shutdown complete"
    );

    Ok(())
}

/// Resolve the configuration file path from `DUOFARM_CONFIG` or the default.
fn config_path() -> PathBuf {
    std::env::var_os("DUOFARM_CONFIG").map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load the configuration, falling back to defaults when the file is absent.
///
/// Returns the configuration and whether the file existed.
fn load_config(path: &std::path::Path) -> Result<(DuofarmConfig, bool), EngineError> {
    if path.exists() {
        let config = DuofarmConfig::from_file(path)?;
        Ok((config, true))
    } else {
        let mut config = DuofarmConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok((config, false))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Flip the shutdown flag on Ctrl-C.
async fn wait_for_ctrl_c(shutdown: watch::Sender<bool>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Ctrl-C received, stopping");
            let _ = shutdown.send(true);
        }
        Err(e) => {
            // Keep the sender alive; dropping it would stop the loop.
            warn!(error = %e, "Cannot listen for Ctrl-C; stop the process another way");
            std::future::pending::<()>().await;
            drop(shutdown);
        }
    }
}
