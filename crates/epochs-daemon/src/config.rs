// crates/epochs-daemon/src/config.rs
//
// Runtime configuration for the epochs daemon.
// Loaded from a TOML file or populated with sensible defaults.

use std::fs;
use std::io;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use epochs_core::error::EpochError;
use epochs_core::genesis::EpochGenesis;
use epochs_core::record::EpochRecord;
use epochs_mint::MintParams;

/// One configured epoch track.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackConfig {
    /// Unique track name, e.g. "day".
    pub identifier: String,

    /// RFC 3339 start time as a quoted string. Defaults to daemon start.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    /// Nominal epoch length in seconds.
    pub duration_secs: u64,
}

/// Runtime configuration for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Directory for local data storage (RocksDB).
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Epoch record store: "memory" or "rocksdb".
    #[serde(default = "default_store")]
    pub store: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Nominal time between ticks, in milliseconds.
    #[serde(default = "default_block_interval_ms")]
    pub block_interval_ms: u64,

    /// Maximum random deviation from the nominal interval, in milliseconds.
    #[serde(default = "default_block_jitter_ms")]
    pub block_jitter_ms: u64,

    /// Stop after this many ticks. Runs until ctrl-c when unset.
    #[serde(default)]
    pub max_ticks: Option<u64>,

    /// Capacity of the epoch event broadcast channel.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Epoch tracks. When empty, the standard `day` and `week` tracks are used.
    #[serde(default)]
    pub tracks: Vec<TrackConfig>,

    /// Mint sink parameters. Minting is disabled when absent.
    #[serde(default)]
    pub mint: Option<MintParams>,
}

fn default_data_dir() -> String {
    "~/.epochs/data".to_string()
}

fn default_store() -> String {
    "memory".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_block_interval_ms() -> u64 {
    5_000
}

fn default_block_jitter_ms() -> u64 {
    1_000
}

fn default_event_channel_capacity() -> usize {
    64
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store: default_store(),
            log_level: default_log_level(),
            block_interval_ms: default_block_interval_ms(),
            block_jitter_ms: default_block_jitter_ms(),
            max_ticks: None,
            event_channel_capacity: default_event_channel_capacity(),
            tracks: Vec::new(),
            mint: None,
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns `Ok(None)` if the file does not exist, and an error if it
    /// exists but cannot be read or parsed.
    pub fn load(path: &str) -> Result<Option<Self>, Box<dyn std::error::Error>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&contents).map(Some)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: DaemonConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Build the validated genesis for the configured tracks.
    ///
    /// Tracks without a start time start at `now`.
    pub fn genesis(&self, now: DateTime<Utc>) -> Result<EpochGenesis, EpochError> {
        let genesis = if self.tracks.is_empty() {
            EpochGenesis::standard(now)
        } else {
            let records = self
                .tracks
                .iter()
                .map(|track| {
                    EpochRecord::new(
                        track.identifier.clone(),
                        track.start_time.unwrap_or(now),
                        Duration::from_secs(track.duration_secs),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;
            EpochGenesis::new(records)
        };
        genesis.validate()?;
        Ok(genesis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = DaemonConfig::parse("").unwrap();
        assert_eq!(config.store, "memory");
        assert_eq!(config.block_interval_ms, 5_000);
        assert!(config.tracks.is_empty());
        assert!(config.mint.is_none());
    }

    #[test]
    fn test_parse_tracks_and_mint() {
        let toml = r#"
            store = "rocksdb"
            block_interval_ms = 250
            max_ticks = 100

            [[tracks]]
            identifier = "minute"
            duration_secs = 60

            [[tracks]]
            identifier = "hour"
            start_time = "2024-01-01T00:00:00Z"
            duration_secs = 3600

            [mint]
            epoch_identifier = "hour"
            genesis_epoch_provisions = 1000
        "#;
        let config = DaemonConfig::parse(toml).unwrap();
        assert_eq!(config.store, "rocksdb");
        assert_eq!(config.max_ticks, Some(100));
        assert_eq!(config.tracks.len(), 2);
        assert_eq!(
            config.tracks[1].start_time,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        let mint = config.mint.unwrap();
        assert_eq!(mint.epoch_identifier, "hour");
        assert_eq!(mint.genesis_epoch_provisions, 1000);
    }

    fn temp_config(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!(
            "epochs_config_{}_{}.toml",
            std::process::id(),
            name
        ));
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_malformed_track_rejected() {
        let quoted = r#"
            [[tracks]]
            identifier = "minute"
            duration_secs = "60"
        "#;
        assert!(DaemonConfig::parse(quoted).is_err());

        let negative = r#"
            [[tracks]]
            identifier = "minute"
            duration_secs = -5
        "#;
        assert!(DaemonConfig::parse(negative).is_err());

        let missing = r#"
            [[tracks]]
            identifier = "minute"
        "#;
        assert!(DaemonConfig::parse(missing).is_err());
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let path = std::env::temp_dir().join(format!(
            "epochs_config_{}_absent.toml",
            std::process::id()
        ));
        let loaded = DaemonConfig::load(&path.to_string_lossy()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path = temp_config("malformed", "[[tracks]]\nidentifier = \"x\"\nduration_secs = -5\n");
        let result = DaemonConfig::load(&path);
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_load_existing_file() {
        let path = temp_config("valid", "block_interval_ms = 250\n");
        let result = DaemonConfig::load(&path);
        fs::remove_file(&path).unwrap();
        let config = result.unwrap().unwrap();
        assert_eq!(config.block_interval_ms, 250);
    }

    #[test]
    fn test_genesis_uses_now_for_missing_start() {
        let now = Utc.timestamp_opt(1_000, 0).unwrap();
        let config = DaemonConfig {
            tracks: vec![TrackConfig {
                identifier: "minute".to_string(),
                start_time: None,
                duration_secs: 60,
            }],
            ..DaemonConfig::default()
        };
        let genesis = config.genesis(now).unwrap();
        assert_eq!(genesis.epochs[0].start_time, now);
    }

    #[test]
    fn test_genesis_defaults_to_standard_tracks() {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let genesis = DaemonConfig::default().genesis(now).unwrap();
        assert_eq!(genesis, EpochGenesis::standard(now));
    }

    #[test]
    fn test_genesis_rejects_zero_duration_and_duplicates() {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let track = |id: &str, secs| TrackConfig {
            identifier: id.to_string(),
            start_time: None,
            duration_secs: secs,
        };

        let zero = DaemonConfig {
            tracks: vec![track("a", 0)],
            ..DaemonConfig::default()
        };
        assert!(matches!(zero.genesis(now), Err(EpochError::InvalidRecord(_))));

        let dup = DaemonConfig {
            tracks: vec![track("a", 10), track("a", 20)],
            ..DaemonConfig::default()
        };
        assert!(matches!(
            dup.genesis(now),
            Err(EpochError::DuplicateIdentifier(_))
        ));
    }
}
