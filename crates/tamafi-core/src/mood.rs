//! Mood classifier.
//!
//! A pure function of the stats, the last environment snapshot and the
//! time since it arrived. Rules are checked in priority order and the first
//! match wins:
//!
//! 1. health < 25, or nothing seen and the last scan is more than 60 s old
//!    (only once a scan has happened) -> [`Mood::Sick`]
//! 2. hunger < 25 -> [`Mood::Hungry`]
//! 3. happiness > 80 and more than 8 networks -> [`Mood::Excited`]
//! 4. happiness > 60 and any network -> [`Mood::Happy`]
//! 5. nothing seen for more than 30 s -> [`Mood::Bored`]
//! 6. any hidden or open network -> [`Mood::Curious`]
//! 7. otherwise [`Mood::Calm`]

use tamafi_types::{Mood, Stats};

use crate::clock::Millis;
use crate::config::EngineConfig;
use crate::state::EnvironmentRecord;

/// Health below this is sickness.
const SICK_HEALTH: i32 = 25;

/// Hunger below this is hungry.
const HUNGRY_HUNGER: i32 = 25;

/// Happiness above this, with a crowded environment, is excitement.
const EXCITED_HAPPINESS: i32 = 80;

/// More networks than this can excite.
const EXCITED_NETWORKS: i32 = 8;

/// Happiness above this, with any network, is happy.
const HAPPY_HAPPINESS: i32 = 60;

/// Classify the creature's mood.
pub fn classify(
    stats: &Stats,
    environment: &EnvironmentRecord,
    now: Millis,
    config: &EngineConfig,
) -> Mood {
    let snapshot = &environment.snapshot;

    let abandoned = snapshot.is_empty()
        && environment
            .scanned_at
            .is_some_and(|at| now.since(at) > config.sick_after_ms);
    if stats.health() < SICK_HEALTH || abandoned {
        return Mood::Sick;
    }

    if stats.hunger() < HUNGRY_HUNGER {
        return Mood::Hungry;
    }

    if stats.happiness() > EXCITED_HAPPINESS && snapshot.network_count > EXCITED_NETWORKS {
        return Mood::Excited;
    }

    if stats.happiness() > HAPPY_HAPPINESS && snapshot.network_count > 0 {
        return Mood::Happy;
    }

    if environment.silent_for(now, config.lonely_after_ms) {
        return Mood::Bored;
    }

    if snapshot.hidden_count > 0 || snapshot.open_count > 0 {
        return Mood::Curious;
    }

    Mood::Calm
}
