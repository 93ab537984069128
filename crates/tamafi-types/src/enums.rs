//! Enumeration types for the TamaFi pet simulation.
//!
//! Every discrete value the engine reads or produces: the creature's life
//! stage, its momentary mood, the activity it is pursuing, the phase of the
//! rest sub-machine, and the command/event vocabularies exchanged with the
//! UI layer.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Life stage
// ---------------------------------------------------------------------------

/// Discrete life phase of the creature.
///
/// Stages are ordered: `Baby < Teen < Adult < Elder`. The engine only ever
/// promotes; the single way back to [`Stage::Baby`] is a full reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Freshly hatched.
    Baby,
    /// Reached after 20 minutes of reasonable care.
    Teen,
    /// Reached after an hour of good care.
    Adult,
    /// Reached after three hours of care.
    Elder,
}

impl Stage {
    /// The byte stored in the persisted record for this stage.
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Baby => 0,
            Self::Teen => 1,
            Self::Adult => 2,
            Self::Elder => 3,
        }
    }

    /// Decode a persisted stage byte. Returns `None` for unknown values.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Baby),
            1 => Some(Self::Teen),
            2 => Some(Self::Adult),
            3 => Some(Self::Elder),
            _ => None,
        }
    }
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Baby => write!(f, "baby"),
            Self::Teen => write!(f, "teen"),
            Self::Adult => write!(f, "adult"),
            Self::Elder => write!(f, "elder"),
        }
    }
}

// ---------------------------------------------------------------------------
// Mood
// ---------------------------------------------------------------------------

/// Momentary emotional classification, recomputed from scratch every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    /// Hunger is critically low.
    Hungry,
    /// Content and surrounded by networks.
    Happy,
    /// Hidden or open networks are around.
    Curious,
    /// Nothing has been seen for a while.
    Bored,
    /// Health is failing or the air has been silent for too long.
    Sick,
    /// Very happy in a crowded radio environment.
    Excited,
    /// Nothing in particular.
    Calm,
}

impl core::fmt::Display for Mood {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Hungry => write!(f, "hungry"),
            Self::Happy => write!(f, "happy"),
            Self::Curious => write!(f, "curious"),
            Self::Bored => write!(f, "bored"),
            Self::Sick => write!(f, "sick"),
            Self::Excited => write!(f, "excited"),
            Self::Calm => write!(f, "calm"),
        }
    }
}

// ---------------------------------------------------------------------------
// Activity and rest phase
// ---------------------------------------------------------------------------

/// The creature's current autonomous pursuit. At most one is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    /// Idle.
    #[default]
    None,
    /// Feeding on nearby networks. Resolved by the next environment snapshot.
    Hunt,
    /// Exploring nearby networks. Resolved by the next environment snapshot.
    Discover,
    /// Sleeping through the rest sub-machine.
    Rest,
}

impl Activity {
    /// Whether this activity waits on an environment snapshot to resolve.
    pub const fn needs_scan(self) -> bool {
        matches!(self, Self::Hunt | Self::Discover)
    }
}

impl core::fmt::Display for Activity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Hunt => write!(f, "hunt"),
            Self::Discover => write!(f, "discover"),
            Self::Rest => write!(f, "rest"),
        }
    }
}

/// Phase of the rest sub-machine. Only meaningful while [`Activity::Rest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestPhase {
    /// Not resting.
    #[default]
    None,
    /// Falling asleep (frame countdown).
    Enter,
    /// Asleep; stats recover at the midpoint.
    Deep,
    /// Waking up (frame advance).
    Wake,
}

// ---------------------------------------------------------------------------
// Command / Event vocabularies
// ---------------------------------------------------------------------------

/// An instruction queued by the UI layer and drained by the engine.
///
/// The "no command" case of the device protocol is represented by
/// `Option::None` at the queue boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Reseed the three stats; age, stage and traits are kept.
    Reset,
    /// Reseed stats, zero the age, return to [`Stage::Baby`] and re-roll traits.
    ResetFull,
}

/// A notification produced by the engine and drained by the UI/audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// A hunt found networks to feed on.
    GoodFeed,
    /// A hunt or discovery found nothing.
    BadFeed,
    /// A discovery found networks.
    Discover,
    /// The creature advanced to a new life stage.
    Evolution,
    /// The creature fell asleep.
    RestStart,
    /// The creature's deep sleep ended.
    RestEnd,
    /// The creature wants an environment scan.
    WifiRequest,
    /// All three stats reached zero.
    Death,
    /// An activity finished and the creature is idle again.
    ActivityEnd,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_ordering_matches_life_cycle() {
        assert!(Stage::Baby < Stage::Teen);
        assert!(Stage::Teen < Stage::Adult);
        assert!(Stage::Adult < Stage::Elder);
    }

    #[test]
    fn stage_byte_round_trip() {
        for stage in [Stage::Baby, Stage::Teen, Stage::Adult, Stage::Elder] {
            assert_eq!(Stage::from_u8(stage.as_u8()), Some(stage));
        }
        assert_eq!(Stage::from_u8(4), None);
        assert_eq!(Stage::from_u8(u8::MAX), None);
    }

    #[test]
    fn only_hunt_and_discover_need_a_scan() {
        assert!(Activity::Hunt.needs_scan());
        assert!(Activity::Discover.needs_scan());
        assert!(!Activity::Rest.needs_scan());
        assert!(!Activity::None.needs_scan());
    }

    #[test]
    fn event_serializes_as_variant_name() {
        let json = serde_json::to_string(&Event::WifiRequest).ok();
        assert_eq!(json.as_deref(), Some("\"WifiRequest\""));
    }
}
