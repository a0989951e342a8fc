// crates/epochs-daemon/src/main.rs
//
// Binary entrypoint for the epochs daemon.
//
// Parses CLI arguments, loads configuration, initializes tracing, opens the
// epoch record store and seeds it from genesis, binds the lifecycle sinks,
// and runs the tick loop until shutdown.

mod clock;
mod config;
mod epoch_events;
mod runner;
mod sinks;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;

use clock::BlockClock;
use config::DaemonConfig;
use sinks::{LoggingSink, SupplyTracker};

use epochs_core::event::EpochEvent;
use epochs_core::genesis::EpochGenesis;
use epochs_core::traits::EpochStore;
use epochs_mint::MintKeeper;
use epochs_scheduler::{EpochScheduler, TickDriver};
use epochs_store::{add_epoch_record, all_epoch_records, MemoryEpochStore, RocksEpochStore};

/// Epochs daemon — partitions a block stream into named epochs.
#[derive(Parser, Debug)]
#[command(name = "epochs-daemon", version = "0.1.0", about = "Multi-track epoch scheduler daemon")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "~/.epochs/config.toml")]
    config: String,

    /// Epoch record store: memory or rocksdb. Overrides the config file.
    #[arg(long)]
    store: Option<String>,

    /// Nominal block interval in milliseconds. Overrides the config file.
    #[arg(long)]
    block_interval_ms: Option<u64>,

    /// Stop after this many ticks. Overrides the config file.
    #[arg(long)]
    max_ticks: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration from TOML file, falling back to defaults only if the
    // file does not exist.
    let config_path = expand_tilde(&args.config);
    let loaded = DaemonConfig::load(&config_path);
    let mut daemon_config = match &loaded {
        Ok(Some(cfg)) => cfg.clone(),
        Ok(None) | Err(_) => DaemonConfig::default(),
    };

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&daemon_config.log_level)),
        )
        .init();

    match loaded {
        Ok(Some(_)) => tracing::info!("Loaded configuration from {}", config_path),
        Ok(None) => tracing::warn!("No config at {}. Using defaults.", config_path),
        Err(e) => {
            tracing::error!("Invalid config at {}: {}", config_path, e);
            return Err(e);
        }
    }

    // CLI flags override config file values.
    if let Some(store) = args.store {
        daemon_config.store = store;
    }
    if let Some(interval) = args.block_interval_ms {
        daemon_config.block_interval_ms = interval;
    }
    if args.max_ticks.is_some() {
        daemon_config.max_ticks = args.max_ticks;
    }

    tracing::info!("Epochs Daemon v0.1.0");
    tracing::info!("Store: {}", daemon_config.store);
    tracing::info!(
        "Block interval: {}ms ± {}ms",
        daemon_config.block_interval_ms,
        daemon_config.block_jitter_ms
    );

    // Tracks are validated here, before any tick is processed.
    let genesis = daemon_config.genesis(Utc::now())?;

    let store = open_store(&daemon_config)?;
    seed_store(store.as_ref(), &genesis)?;
    for record in all_epoch_records(store.as_ref())? {
        tracing::info!(
            "Track {}: duration={:?} start={} epoch={} started={}",
            record.identifier,
            record.duration,
            record.start_time,
            record.current_epoch,
            record.epoch_counting_started
        );
    }

    // Bind sinks in dispatch order.
    let mut scheduler = EpochScheduler::new(store.clone()).with_sink(Arc::new(LoggingSink));
    let supply = Arc::new(SupplyTracker::default());
    let mint_keeper = match daemon_config.mint.clone() {
        Some(params) => {
            let keeper = Arc::new(MintKeeper::new(params)?.with_hook(supply.clone()));
            tracing::info!(
                "Minting enabled on track {} ({} {} per epoch)",
                keeper.params().epoch_identifier,
                keeper.params().genesis_epoch_provisions,
                keeper.params().mint_denom
            );
            scheduler = scheduler.with_sink(keeper.clone());
            Some(keeper)
        }
        None => None,
    };

    // Create broadcast channel for epoch events.
    let (event_tx, event_rx) =
        tokio::sync::broadcast::channel::<EpochEvent>(daemon_config.event_channel_capacity);
    let logger = tokio::spawn(epoch_events::run_event_logger(event_rx));

    let clock = BlockClock::new(
        Duration::from_millis(daemon_config.block_interval_ms),
        Duration::from_millis(daemon_config.block_jitter_ms),
    );
    let result = runner::run_tick_loop(
        TickDriver::new(scheduler),
        clock,
        event_tx,
        daemon_config.max_ticks,
    )
    .await;

    // The sender is dropped with the loop; let the logger drain.
    if let Err(e) = logger.await {
        tracing::warn!("Event logger task failed: {}", e);
    }

    if let Some(keeper) = mint_keeper {
        let state = keeper.snapshot()?;
        tracing::info!(
            "Minted {} {} over {} distributions; total supply {}",
            supply.minted(),
            keeper.params().mint_denom,
            supply.distributions(),
            state.ledger.total_supply()
        );
    }

    let ticks = result?;
    tracing::info!("Epochs daemon shut down gracefully after {} ticks", ticks);
    Ok(())
}

/// Open the configured epoch record store.
fn open_store(config: &DaemonConfig) -> Result<Arc<dyn EpochStore>, Box<dyn std::error::Error>> {
    match config.store.as_str() {
        "memory" => Ok(Arc::new(MemoryEpochStore::new())),
        "rocksdb" => {
            let path = format!("{}/epochs_rocksdb", expand_tilde(&config.data_dir));
            let store = RocksEpochStore::open(&path)?;
            tracing::info!("RocksDB epoch store opened at {}", path);
            Ok(Arc::new(store))
        }
        other => Err(format!("Unknown store: {}. Use 'memory' or 'rocksdb'.", other).into()),
    }
}

/// Add genesis tracks that the store does not already hold.
///
/// Existing records keep their persisted progress across restarts.
fn seed_store(
    store: &dyn EpochStore,
    genesis: &EpochGenesis,
) -> Result<(), Box<dyn std::error::Error>> {
    for record in &genesis.epochs {
        if store.get(&record.identifier)?.is_some() {
            tracing::info!("Resuming persisted track {}", record.identifier);
            continue;
        }
        add_epoch_record(store, record.clone())?;
    }
    Ok(())
}

/// Expand `~` at the start of a path to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
