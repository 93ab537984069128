//! Configuration loading and typed config structures for TamaFi.
//!
//! The configuration lives in `tamafi-config.yaml`. Every key is optional:
//! an empty document yields the stock device behaviour. The loader reads the
//! YAML, applies environment overrides, and validates the ranges the engine
//! draws random values from.
//!
//! Only timing is tunable. The reward formulas and utility modifiers are
//! game-balance constants that live next to the code that uses them.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TamafiConfig {
    /// Behaviour engine timing.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Device host loop settings.
    #[serde(default)]
    pub host: HostConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TamafiConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `TAMAFI_SEED` overrides `host.seed`
    /// - `TAMAFI_STATE_PATH` overrides `host.state_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.host.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.host.validate()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Timing parameters of the behaviour engine. All values are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Hunger decay period (default: 5000).
    #[serde(default = "default_hunger_interval_ms")]
    pub hunger_interval_ms: u32,

    /// Happiness decay period (default: 7000).
    #[serde(default = "default_happiness_interval_ms")]
    pub happiness_interval_ms: u32,

    /// Health decay period (default: 10000).
    #[serde(default = "default_health_interval_ms")]
    pub health_interval_ms: u32,

    /// Period of one age minute (default: 60000).
    #[serde(default = "default_age_interval_ms")]
    pub age_interval_ms: u32,

    /// Silence after which an empty environment makes the creature lonely
    /// and bored (default: 30000).
    #[serde(default = "default_lonely_after_ms")]
    pub lonely_after_ms: u32,

    /// Silence after which an empty environment makes the creature sick,
    /// once at least one scan has happened (default: 60000).
    #[serde(default = "default_sick_after_ms")]
    pub sick_after_ms: u32,

    /// Step between rest animation frames (default: 400).
    #[serde(default = "default_rest_frame_ms")]
    pub rest_frame_ms: u32,

    /// Shortest deep-rest duration, inclusive (default: 5000).
    #[serde(default = "default_rest_min_ms")]
    pub rest_min_ms: u32,

    /// Longest deep-rest duration, exclusive (default: 15000).
    #[serde(default = "default_rest_max_ms")]
    pub rest_max_ms: u32,

    /// Shortest decision cooldown, inclusive (default: 8000).
    #[serde(default = "default_decision_min_ms")]
    pub decision_min_ms: u32,

    /// Longest decision cooldown, exclusive (default: 15000).
    #[serde(default = "default_decision_max_ms")]
    pub decision_max_ms: u32,

    /// Cooldown before the very first decision (default: 10000).
    #[serde(default = "default_initial_decision_ms")]
    pub initial_decision_ms: u32,

    /// Step between feed-effect overlay frames (default: 100).
    #[serde(default = "default_feed_frame_ms")]
    pub feed_frame_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hunger_interval_ms: default_hunger_interval_ms(),
            happiness_interval_ms: default_happiness_interval_ms(),
            health_interval_ms: default_health_interval_ms(),
            age_interval_ms: default_age_interval_ms(),
            lonely_after_ms: default_lonely_after_ms(),
            sick_after_ms: default_sick_after_ms(),
            rest_frame_ms: default_rest_frame_ms(),
            rest_min_ms: default_rest_min_ms(),
            rest_max_ms: default_rest_max_ms(),
            decision_min_ms: default_decision_min_ms(),
            decision_max_ms: default_decision_max_ms(),
            initial_decision_ms: default_initial_decision_ms(),
            feed_frame_ms: default_feed_frame_ms(),
        }
    }
}

impl EngineConfig {
    /// Reject empty random ranges and zero decay periods.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rest_min_ms >= self.rest_max_ms {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "engine.rest_min_ms ({}) must be below engine.rest_max_ms ({})",
                    self.rest_min_ms, self.rest_max_ms
                ),
            });
        }
        if self.decision_min_ms >= self.decision_max_ms {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "engine.decision_min_ms ({}) must be below engine.decision_max_ms ({})",
                    self.decision_min_ms, self.decision_max_ms
                ),
            });
        }
        let periods = [
            ("engine.hunger_interval_ms", self.hunger_interval_ms),
            ("engine.happiness_interval_ms", self.happiness_interval_ms),
            ("engine.health_interval_ms", self.health_interval_ms),
            ("engine.age_interval_ms", self.age_interval_ms),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    reason: format!("{name} must be at least 1"),
                });
            }
        }
        Ok(())
    }
}

const fn default_hunger_interval_ms() -> u32 {
    5_000
}
const fn default_happiness_interval_ms() -> u32 {
    7_000
}
const fn default_health_interval_ms() -> u32 {
    10_000
}
const fn default_age_interval_ms() -> u32 {
    60_000
}
const fn default_lonely_after_ms() -> u32 {
    30_000
}
const fn default_sick_after_ms() -> u32 {
    60_000
}
const fn default_rest_frame_ms() -> u32 {
    400
}
const fn default_rest_min_ms() -> u32 {
    5_000
}
const fn default_rest_max_ms() -> u32 {
    15_000
}
const fn default_decision_min_ms() -> u32 {
    8_000
}
const fn default_decision_max_ms() -> u32 {
    15_000
}
const fn default_initial_decision_ms() -> u32 {
    10_000
}
const fn default_feed_frame_ms() -> u32 {
    100
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// Settings for the headless device host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    /// Seed for the engine and scanner RNGs. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Milliseconds between ticks (default: 100).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u32,

    /// Sleep between ticks in real time. When `false` the clock advances
    /// by `tick_interval_ms` per iteration without waiting.
    #[serde(default = "default_true")]
    pub realtime: bool,

    /// Stop after this many ticks (0 = run until interrupted).
    #[serde(default)]
    pub max_ticks: u64,

    /// Whether the creature may choose activities on its own.
    #[serde(default = "default_true")]
    pub autonomous: bool,

    /// Where the persisted record is kept.
    #[serde(default = "default_state_path")]
    pub state_path: String,

    /// Shortest simulated scan latency, inclusive (default: 1500).
    #[serde(default = "default_scan_latency_min_ms")]
    pub scan_latency_min_ms: u32,

    /// Longest simulated scan latency, exclusive (default: 3500).
    #[serde(default = "default_scan_latency_max_ms")]
    pub scan_latency_max_ms: u32,

    /// Most networks the synthetic scanner reports in one scan (default: 16).
    #[serde(default = "default_scan_max_networks")]
    pub scan_max_networks: u32,

    /// Issue a full reset this long after death (0 = stay dead).
    #[serde(default = "default_revive_after_ms")]
    pub revive_after_ms: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval_ms: default_tick_interval_ms(),
            realtime: true,
            max_ticks: 0,
            autonomous: true,
            state_path: default_state_path(),
            scan_latency_min_ms: default_scan_latency_min_ms(),
            scan_latency_max_ms: default_scan_latency_max_ms(),
            scan_max_networks: default_scan_max_networks(),
            revive_after_ms: default_revive_after_ms(),
        }
    }
}

impl HostConfig {
    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(seed) = std::env::var("TAMAFI_SEED")
            && let Ok(parsed) = seed.parse::<u64>()
        {
            self.seed = Some(parsed);
        }
        if let Ok(path) = std::env::var("TAMAFI_STATE_PATH") {
            self.state_path = path;
        }
    }

    /// Reject a zero tick period, an empty latency range and an unbounded
    /// virtual-time run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "host.tick_interval_ms must be at least 1".to_owned(),
            });
        }
        if !self.realtime && self.max_ticks == 0 {
            return Err(ConfigError::Invalid {
                reason: "host.max_ticks must be set when host.realtime is false".to_owned(),
            });
        }
        if self.scan_latency_min_ms >= self.scan_latency_max_ms {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "host.scan_latency_min_ms ({}) must be below host.scan_latency_max_ms ({})",
                    self.scan_latency_min_ms, self.scan_latency_max_ms
                ),
            });
        }
        Ok(())
    }
}

const fn default_tick_interval_ms() -> u32 {
    100
}
const fn default_true() -> bool {
    true
}
fn default_state_path() -> String {
    "tamafi-state.json".to_owned()
}
const fn default_scan_latency_min_ms() -> u32 {
    1_500
}
const fn default_scan_latency_max_ms() -> u32 {
    3_500
}
const fn default_scan_max_networks() -> u32 {
    16
}
const fn default_revive_after_ms() -> u32 {
    10_000
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = TamafiConfig::parse("").unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.host.tick_interval_ms, 100);
    }

    #[test]
    fn default_engine_timing_matches_device() {
        let engine = EngineConfig::default();
        assert_eq!(engine.hunger_interval_ms, 5_000);
        assert_eq!(engine.happiness_interval_ms, 7_000);
        assert_eq!(engine.health_interval_ms, 10_000);
        assert_eq!(engine.age_interval_ms, 60_000);
        assert_eq!(engine.rest_frame_ms, 400);
        assert_eq!((engine.rest_min_ms, engine.rest_max_ms), (5_000, 15_000));
        assert_eq!((engine.decision_min_ms, engine.decision_max_ms), (8_000, 15_000));
        assert_eq!(engine.initial_decision_ms, 10_000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = "engine:\n  hunger_interval_ms: 1000\nhost:\n  realtime: false\n  max_ticks: 50\n";
        let config = TamafiConfig::parse(yaml).unwrap();
        assert_eq!(config.engine.hunger_interval_ms, 1_000);
        assert_eq!(config.engine.health_interval_ms, 10_000);
        assert!(!config.host.realtime);
        assert_eq!(config.host.max_ticks, 50);
        assert!(config.host.autonomous);
    }

    #[test]
    fn empty_rest_range_is_rejected() {
        let yaml = "engine:\n  rest_min_ms: 9000\n  rest_max_ms: 9000\n";
        let result = TamafiConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn inverted_decision_range_is_rejected() {
        let config = EngineConfig {
            decision_min_ms: 20_000,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_decay_period_is_rejected() {
        let config = EngineConfig {
            age_interval_ms: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let yaml = "host:\n  tick_interval_ms: 0\n";
        assert!(TamafiConfig::parse(yaml).is_err());
    }

    #[test]
    fn virtual_time_needs_a_tick_limit() {
        let yaml = "host:\n  realtime: false\n";
        assert!(TamafiConfig::parse(yaml).is_err());

        let yaml = "host:\n  realtime: false\n  max_ticks: 600\n";
        assert!(TamafiConfig::parse(yaml).is_ok());
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let result = TamafiConfig::parse("engine: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }
}
