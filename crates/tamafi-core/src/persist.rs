//! Persisted-state schema and the storage collaborator.
//!
//! A [`PersistedRecord`] is the flat set of values that survives a power
//! cycle: stats, age, stage, the hatched flag, personality, and the UI
//! layer's own settings, which the engine stores but never reads. Timers,
//! mood, activity and the environment are not persisted; a restored
//! creature wakes up idle with every timer restarted.
//!
//! Fields missing from a stored record fall back to the values a fresh
//! creature would have (stats 70, traits 70/60/40).

use serde::{Deserialize, Serialize};
use tamafi_types::{Age, Stage, Stats, Traits};

use crate::clock::Millis;
use crate::config::EngineConfig;
use crate::state::PetState;

/// Errors from restoring or storing a record.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The stored stage byte names no known stage.
    #[error("invalid stored stage byte: {value}")]
    InvalidStage {
        /// The offending byte.
        value: u8,
    },

    /// The backing store could not be read or written.
    #[error("state store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored bytes could not be encoded or decoded.
    #[error("state encoding error: {message}")]
    Encoding {
        /// Description of the failure.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// UI settings
// ---------------------------------------------------------------------------

/// Settings owned by the UI layer, stored alongside the creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Speaker volume level.
    #[serde(default = "default_sound_volume")]
    pub sound_volume: u8,

    /// Index into the display brightness table.
    #[serde(default = "default_brightness_index")]
    pub brightness_index: u8,

    /// Selected creature skin.
    #[serde(default)]
    pub skin_index: u8,

    /// Idle time before the display sleeps.
    #[serde(default = "default_auto_sleep_ms")]
    pub auto_sleep_ms: u32,

    /// Interval between automatic saves, in whole seconds.
    #[serde(default = "default_auto_save_secs")]
    pub auto_save_secs: u16,
}

const fn default_sound_volume() -> u8 {
    3
}

const fn default_brightness_index() -> u8 {
    1
}

const fn default_auto_sleep_ms() -> u32 {
    60_000
}

const fn default_auto_save_secs() -> u16 {
    30
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            sound_volume: default_sound_volume(),
            brightness_index: default_brightness_index(),
            skin_index: 0,
            auto_sleep_ms: default_auto_sleep_ms(),
            auto_save_secs: default_auto_save_secs(),
        }
    }
}

impl UiSettings {
    /// The auto-save interval in milliseconds.
    pub fn auto_save_ms(&self) -> u32 {
        u32::from(self.auto_save_secs).saturating_mul(1_000)
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

const fn default_stat() -> i32 {
    Stats::SEED
}

const fn default_stage_byte() -> u8 {
    Stage::Baby.as_u8()
}

fn default_curiosity() -> u8 {
    Traits::default().curiosity
}

fn default_activity() -> u8 {
    Traits::default().activity
}

fn default_stress() -> u8 {
    Traits::default().stress
}

/// Everything written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    /// Hunger stat.
    #[serde(default = "default_stat")]
    pub hunger: i32,
    /// Happiness stat.
    #[serde(default = "default_stat")]
    pub happiness: i32,
    /// Health stat.
    #[serde(default = "default_stat")]
    pub health: i32,

    /// Age minutes counter.
    #[serde(default)]
    pub age_minutes: u32,
    /// Age hours counter.
    #[serde(default)]
    pub age_hours: u32,
    /// Age days counter.
    #[serde(default)]
    pub age_days: u32,

    /// Life stage as its byte encoding.
    #[serde(default = "default_stage_byte")]
    pub stage: u8,

    /// Whether the egg has ever hatched.
    #[serde(default)]
    pub hatched: bool,

    /// Curiosity trait.
    #[serde(default = "default_curiosity")]
    pub curiosity: u8,
    /// Activity trait.
    #[serde(default = "default_activity")]
    pub activity: u8,
    /// Stress trait.
    #[serde(default = "default_stress")]
    pub stress: u8,

    /// UI-layer settings.
    #[serde(flatten)]
    pub settings: UiSettings,
}

impl PersistedRecord {
    /// Snapshot the persistent part of `state`.
    ///
    /// Queued commands are not part of the record; flush them first.
    pub fn capture(state: &PetState, settings: UiSettings, hatched: bool) -> Self {
        let stats = state.stats();
        let age = state.age();
        let traits = state.traits();
        Self {
            hunger: stats.hunger(),
            happiness: stats.happiness(),
            health: stats.health(),
            age_minutes: age.minutes,
            age_hours: age.hours,
            age_days: age.days,
            stage: state.stage().as_u8(),
            hatched,
            curiosity: traits.curiosity,
            activity: traits.activity,
            stress: traits.stress,
            settings,
        }
    }

    /// Rebuild an idle creature from this record, with every timer
    /// restarted at `now`. Stats and traits are clamped into range.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::InvalidStage`] if the stage byte is unknown.
    pub fn restore(&self, now: Millis, config: &EngineConfig) -> Result<PetState, PersistError> {
        let stage =
            Stage::from_u8(self.stage).ok_or(PersistError::InvalidStage { value: self.stage })?;

        let mut state = PetState::new(now, self.traits(), config);
        state.stats = Stats::new(self.hunger, self.happiness, self.health);
        state.age = Age::new(self.age_minutes, self.age_hours, self.age_days);
        state.stage = stage;
        Ok(state)
    }

    /// The stored personality, each trait capped at 100.
    pub const fn traits(&self) -> Traits {
        Traits::new(self.curiosity, self.activity, self.stress)
    }
}

/// What the caller gets back from booting: the creature and the
/// UI-layer values stored with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootState {
    /// The restored or freshly created creature.
    pub state: PetState,
    /// Stored UI settings (defaults on first boot).
    pub settings: UiSettings,
    /// Whether the egg has hatched before.
    pub hatched: bool,
    /// `true` when no record existed and defaults were written.
    pub first_boot: bool,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Durable storage for one [`PersistedRecord`].
pub trait StateStore {
    /// Load the stored record, or `None` on first boot.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the store exists but cannot be read.
    fn load(&mut self) -> Result<Option<PersistedRecord>, PersistError>;

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the write fails.
    fn save(&mut self, record: &PersistedRecord) -> Result<(), PersistError>;
}

/// A store that keeps the record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<PersistedRecord>,
    saves: u64,
}

impl MemoryStore {
    /// An empty store (first boot).
    pub const fn new() -> Self {
        Self {
            record: None,
            saves: 0,
        }
    }

    /// A store already holding `record`.
    pub const fn with_record(record: PersistedRecord) -> Self {
        Self {
            record: Some(record),
            saves: 0,
        }
    }

    /// The stored record, if any.
    pub const fn record(&self) -> Option<&PersistedRecord> {
        self.record.as_ref()
    }

    /// How many times [`save`](StateStore::save) was called.
    pub const fn saves(&self) -> u64 {
        self.saves
    }
}

impl StateStore for MemoryStore {
    fn load(&mut self) -> Result<Option<PersistedRecord>, PersistError> {
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &PersistedRecord) -> Result<(), PersistError> {
        self.record = Some(record.clone());
        self.saves = self.saves.saturating_add(1);
        Ok(())
    }
}
