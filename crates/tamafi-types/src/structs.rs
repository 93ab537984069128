//! Core data structs for the TamaFi pet simulation.
//!
//! - [`Stats`] -- hunger, happiness and health, clamped to `[0, 100]`
//! - [`Age`] -- minute/hour/day counters with carry
//! - [`Traits`] -- the creature's fixed personality bytes
//!
//! All arithmetic saturates. A stat can never be observed outside its
//! range, whatever delta is applied to it.

use serde::{Deserialize, Serialize};

/// Lowest value a stat can hold.
pub const STAT_MIN: i32 = 0;

/// Highest value a stat can hold.
pub const STAT_MAX: i32 = 100;

/// Clamp a raw stat value into `[STAT_MIN, STAT_MAX]`.
pub const fn clamp_stat(value: i32) -> i32 {
    if value < STAT_MIN {
        STAT_MIN
    } else if value > STAT_MAX {
        STAT_MAX
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// The three vital stats of the creature.
///
/// Fields are private so every mutation goes through a clamping method.
/// Deserialized values are clamped through [`Stats::new`] as well.
/// Higher is better for all three: a hunger of 100 means fully fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawStats")]
pub struct Stats {
    hunger: i32,
    happiness: i32,
    health: i32,
}

/// Unchecked wire form of [`Stats`].
#[derive(Deserialize)]
struct RawStats {
    hunger: i32,
    happiness: i32,
    health: i32,
}

impl From<RawStats> for Stats {
    fn from(raw: RawStats) -> Self {
        Self::new(raw.hunger, raw.happiness, raw.health)
    }
}

impl Stats {
    /// Value every stat is reseeded to on creation and on reset.
    pub const SEED: i32 = 70;

    /// Build a stat block, clamping each value into range.
    pub const fn new(hunger: i32, happiness: i32, health: i32) -> Self {
        Self {
            hunger: clamp_stat(hunger),
            happiness: clamp_stat(happiness),
            health: clamp_stat(health),
        }
    }

    /// The stat block of a freshly created or reset creature (70/70/70).
    pub const fn seeded() -> Self {
        Self::new(Self::SEED, Self::SEED, Self::SEED)
    }

    /// Current hunger (100 = fully fed).
    pub const fn hunger(&self) -> i32 {
        self.hunger
    }

    /// Current happiness.
    pub const fn happiness(&self) -> i32 {
        self.happiness
    }

    /// Current health.
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Add `delta` to hunger, clamping the result.
    pub const fn adjust_hunger(&mut self, delta: i32) {
        self.hunger = clamp_stat(self.hunger.saturating_add(delta));
    }

    /// Add `delta` to happiness, clamping the result.
    pub const fn adjust_happiness(&mut self, delta: i32) {
        self.happiness = clamp_stat(self.happiness.saturating_add(delta));
    }

    /// Add `delta` to health, clamping the result.
    pub const fn adjust_health(&mut self, delta: i32) {
        self.health = clamp_stat(self.health.saturating_add(delta));
    }

    /// Integer mean of the three stats.
    pub const fn average(&self) -> i32 {
        self.hunger
            .saturating_add(self.happiness)
            .saturating_add(self.health)
            .saturating_div(3)
    }

    /// Whether all three stats have hit zero at once.
    pub const fn all_depleted(&self) -> bool {
        self.hunger <= STAT_MIN && self.happiness <= STAT_MIN && self.health <= STAT_MIN
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::seeded()
    }
}

// ---------------------------------------------------------------------------
// Age
// ---------------------------------------------------------------------------

/// Minutes per hour for the age carry.
const MINUTES_PER_HOUR: u32 = 60;

/// Hours per day for the age carry.
const HOURS_PER_DAY: u32 = 24;

/// Creature age as three carried counters.
///
/// `minutes` stays below 60 and `hours` below 24 after every
/// [`advance_minute`](Self::advance_minute).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Age {
    /// Minutes within the current hour.
    pub minutes: u32,
    /// Hours within the current day.
    pub hours: u32,
    /// Whole days lived.
    pub days: u32,
}

impl Age {
    /// Build an age from raw counters (as restored from storage).
    pub const fn new(minutes: u32, hours: u32, days: u32) -> Self {
        Self {
            minutes,
            hours,
            days,
        }
    }

    /// Add one minute, carrying into hours at 60 and into days at 24.
    pub const fn advance_minute(&mut self) {
        self.minutes = self.minutes.saturating_add(1);
        if self.minutes >= MINUTES_PER_HOUR {
            self.minutes = self.minutes.saturating_sub(MINUTES_PER_HOUR);
            self.hours = self.hours.saturating_add(1);
        }
        if self.hours >= HOURS_PER_DAY {
            self.hours = self.hours.saturating_sub(HOURS_PER_DAY);
            self.days = self.days.saturating_add(1);
        }
    }

    /// Total age expressed in minutes (saturating).
    pub fn total_minutes(&self) -> u64 {
        let days_in_minutes = u64::from(self.days).saturating_mul(1440);
        let hours_in_minutes = u64::from(self.hours).saturating_mul(60);
        days_in_minutes
            .saturating_add(hours_in_minutes)
            .saturating_add(u64::from(self.minutes))
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// The creature's personality, rolled at creation and on full reset only.
///
/// Each trait is a byte in `[0, 100]`. The default values are the fallbacks
/// used when a stored record lacks trait keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawTraits")]
pub struct Traits {
    /// Drives the urge to hunt and discover.
    pub curiosity: u8,
    /// General liveliness. Stored and shown, not used by the decision engine.
    pub activity: u8,
    /// Drives the urge to rest.
    pub stress: u8,
}

/// Highest value a trait can hold.
pub const TRAIT_MAX: u8 = 100;

impl Traits {
    /// Build a personality, capping each trait at [`TRAIT_MAX`].
    pub const fn new(curiosity: u8, activity: u8, stress: u8) -> Self {
        Self {
            curiosity: cap_trait(curiosity),
            activity: cap_trait(activity),
            stress: cap_trait(stress),
        }
    }
}

const fn cap_trait(value: u8) -> u8 {
    if value > TRAIT_MAX {
        TRAIT_MAX
    } else {
        value
    }
}

/// Unchecked wire form of [`Traits`].
#[derive(Deserialize)]
struct RawTraits {
    curiosity: u8,
    activity: u8,
    stress: u8,
}

impl From<RawTraits> for Traits {
    fn from(raw: RawTraits) -> Self {
        Self::new(raw.curiosity, raw.activity, raw.stress)
    }
}

impl Default for Traits {
    fn default() -> Self {
        Self {
            curiosity: 70,
            activity: 60,
            stress: 40,
        }
    }
}
