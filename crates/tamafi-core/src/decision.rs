//! Utility-scoring activity picker.
//!
//! When the creature is idle and its decision cooldown has run out, four
//! desires are scored from stats, personality, the last environment
//! snapshot and the current mood. The strongest desire that beats idling
//! wins. Ties keep the earlier candidate, evaluated as hunt, discover,
//! rest.
//!
//! The weights below are game-balance constants and are not configurable.

use rand::Rng;
use tamafi_types::{Activity, Event, Mood, RestPhase, Stats, Traits};
use tracing::{debug, info};

use crate::clock::Millis;
use crate::config::EngineConfig;
use crate::rest::begin_rest;
use crate::state::{EnvironmentRecord, PetState};

/// Baseline score a candidate must beat.
pub const IDLE_DESIRE: i32 = 10;

/// Upper bound (exclusive) of the random discover jitter.
pub const DISCOVER_JITTER_MAX: i32 = 20;

/// Hunger below this dampens the urge to rest.
const STARVING_HUNGER: i32 = 20;

/// Scored desire for each candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Desires {
    /// Urge to feed on nearby networks.
    pub hunt: i32,
    /// Urge to explore nearby networks.
    pub discover: i32,
    /// Urge to sleep.
    pub rest: i32,
    /// Urge to do nothing.
    pub idle: i32,
}

impl Desires {
    /// The winning activity, or `None` if idling wins.
    pub const fn choose(&self) -> Option<Activity> {
        let mut best = self.idle;
        let mut chosen = None;
        if self.hunt > best {
            best = self.hunt;
            chosen = Some(Activity::Hunt);
        }
        if self.discover > best {
            best = self.discover;
            chosen = Some(Activity::Discover);
        }
        if self.rest > best {
            chosen = Some(Activity::Rest);
        }
        chosen
    }
}

/// Score every candidate. `jitter` is the random discover bonus in
/// `[0, DISCOVER_JITTER_MAX)`.
pub fn score(
    stats: &Stats,
    traits: Traits,
    environment: &EnvironmentRecord,
    mood: Mood,
    jitter: i32,
) -> Desires {
    let snapshot = &environment.snapshot;
    let nothing_known = snapshot.network_count == 0;
    let curiosity = i32::from(traits.curiosity);
    let stress = i32::from(traits.stress);

    let mut hunt = 100_i32
        .saturating_sub(stats.hunger())
        .saturating_add(curiosity.saturating_div(2));
    if nothing_known {
        hunt = hunt.saturating_div(2);
    }

    let mut discover = curiosity
        .saturating_add(snapshot.hidden_count.saturating_mul(10))
        .saturating_add(snapshot.open_count.saturating_mul(6))
        .saturating_add(snapshot.network_count.saturating_mul(2))
        .saturating_add(jitter);
    if nothing_known {
        discover = discover.saturating_div(2);
    }

    let mut rest = 100_i32
        .saturating_sub(stats.health())
        .saturating_add(stress.saturating_div(2));
    if stats.hunger() < STARVING_HUNGER {
        rest = rest.saturating_sub(10);
    }

    let (hunt_mod, discover_mod, rest_mod) = match mood {
        Mood::Hungry => (20, 0, -10),
        Mood::Curious => (0, 15, 0),
        Mood::Sick => (0, -10, 20),
        Mood::Excited | Mood::Bored => (5, 10, 0),
        Mood::Happy | Mood::Calm => (0, 0, 0),
    };

    Desires {
        hunt: hunt.saturating_add(hunt_mod).max(0),
        discover: discover.saturating_add(discover_mod).max(0),
        rest: rest.saturating_add(rest_mod).max(0),
        idle: IDLE_DESIRE,
    }
}

/// Run one autonomous decision if the creature is idle and its cooldown
/// has elapsed.
///
/// Every attempt past the cooldown restarts it with a fresh random
/// length, whether or not an activity is chosen. Hunt and Discover emit
/// [`Event::WifiRequest`] and wait for a scan; Rest starts immediately.
pub fn decide<R: Rng>(
    state: &mut PetState,
    now: Millis,
    config: &EngineConfig,
    rng: &mut R,
) -> Option<Activity> {
    if state.activity != Activity::None || state.rest.phase != RestPhase::None {
        return None;
    }
    if state.decision_timer.elapsed(now) < state.decision_cooldown_ms {
        return None;
    }

    state.decision_timer.restart(now);
    state.decision_cooldown_ms = rng.random_range(config.decision_min_ms..config.decision_max_ms);

    let jitter = rng.random_range(0..DISCOVER_JITTER_MAX);
    let desires = score(
        &state.stats,
        state.traits,
        &state.environment,
        state.mood,
        jitter,
    );

    debug!(
        hunt = desires.hunt,
        discover = desires.discover,
        rest = desires.rest,
        mood = %state.mood,
        next_cooldown_ms = state.decision_cooldown_ms,
        "Desires scored"
    );

    let chosen = desires.choose()?;
    match chosen {
        Activity::Hunt | Activity::Discover => {
            state.activity = chosen;
            state.emit(Event::WifiRequest);
            info!(activity = %chosen, "Activity chosen, scan requested");
        }
        Activity::Rest => {
            let duration = rng.random_range(config.rest_min_ms..config.rest_max_ms);
            begin_rest(state, now, duration);
        }
        Activity::None => return None,
    }
    Some(chosen)
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use tamafi_types::EnvironmentSnapshot;

    use super::*;

    fn record(networks: i32, hidden: i32, open: i32) -> EnvironmentRecord {
        EnvironmentRecord {
            snapshot: EnvironmentSnapshot {
                network_count: networks,
                hidden_count: hidden,
                open_count: open,
                secured_count: networks.saturating_sub(open),
                avg_signal: -70,
                ..EnvironmentSnapshot::default()
            },
            scanned_at: Some(Millis::ZERO),
            ready: false,
        }
    }

    #[test]
    fn empty_environment_halves_hunt_and_discover() {
        let desires = score(
            &Stats::new(10, 70, 100),
            Traits::default(),
            &EnvironmentRecord::default(),
            Mood::Calm,
            0,
        );
        // (90 + 35) / 2 and (70 + 0) / 2
        assert_eq!(desires.hunt, 62);
        assert_eq!(desires.discover, 35);
        assert_eq!(desires.rest, 10);
        assert_eq!(desires.choose(), Some(Activity::Hunt));
    }

    #[test]
    fn networks_raise_discover() {
        let desires = score(
            &Stats::seeded(),
            Traits::default(),
            &record(5, 1, 2),
            Mood::Calm,
            7,
        );
        // 70 + 10 + 12 + 10 + 7
        assert_eq!(desires.discover, 109);
        // 30 + 35
        assert_eq!(desires.hunt, 65);
        // 30 + 20
        assert_eq!(desires.rest, 50);
        assert_eq!(desires.choose(), Some(Activity::Discover));
    }

    #[test]
    fn starving_dampens_rest() {
        let desires = score(
            &Stats::new(19, 70, 50),
            Traits::default(),
            &record(1, 0, 0),
            Mood::Calm,
            0,
        );
        // 50 + 20 - 10
        assert_eq!(desires.rest, 60);
    }

    #[test]
    fn mood_modifiers_apply() {
        let scored = |mood| score(&Stats::seeded(), Traits::default(), &record(3, 0, 0), mood, 0);
        let base = scored(Mood::Calm);
        let shift = |mood| {
            let desires = scored(mood);
            (
                desires.hunt - base.hunt,
                desires.discover - base.discover,
                desires.rest - base.rest,
            )
        };

        assert_eq!(shift(Mood::Hungry), (20, 0, -10));
        assert_eq!(shift(Mood::Curious), (0, 15, 0));
        assert_eq!(shift(Mood::Sick), (0, -10, 20));
        assert_eq!(shift(Mood::Excited), (5, 10, 0));
        assert_eq!(shift(Mood::Bored), (5, 10, 0));
        assert_eq!(shift(Mood::Happy), (0, 0, 0));
    }

    #[test]
    fn scores_never_go_negative() {
        let traits = Traits {
            curiosity: 0,
            activity: 0,
            stress: 0,
        };
        let desires = score(
            &Stats::new(10, 100, 100),
            traits,
            &EnvironmentRecord::default(),
            Mood::Sick,
            0,
        );
        assert_eq!(desires.rest, 10);
        assert_eq!(desires.discover, 0);
    }

    #[test]
    fn idle_wins_when_nothing_beats_it() {
        let desires = Desires {
            hunt: 10,
            discover: 3,
            rest: 0,
            idle: IDLE_DESIRE,
        };
        assert_eq!(desires.choose(), None);
    }

    #[test]
    fn ties_favour_earlier_candidate() {
        let desires = Desires {
            hunt: 40,
            discover: 40,
            rest: 40,
            idle: IDLE_DESIRE,
        };
        assert_eq!(desires.choose(), Some(Activity::Hunt));

        let desires = Desires {
            hunt: 5,
            discover: 40,
            rest: 40,
            idle: IDLE_DESIRE,
        };
        assert_eq!(desires.choose(), Some(Activity::Discover));
    }

    #[test]
    fn no_decision_before_cooldown() {
        let config = EngineConfig::default();
        let mut state = PetState::new(Millis::ZERO, Traits::default(), &config);
        let mut rng = SmallRng::seed_from_u64(1);

        assert_eq!(decide(&mut state, Millis(9_999), &config, &mut rng), None);
        assert_eq!(state.decision_cooldown_ms, 10_000);
    }

    #[test]
    fn decision_redraws_cooldown() {
        let config = EngineConfig::default();
        let mut state = PetState::new(Millis::ZERO, Traits::default(), &config);
        let mut rng = SmallRng::seed_from_u64(1);

        decide(&mut state, Millis(10_000), &config, &mut rng);

        assert_eq!(state.decision_timer.last(), Millis(10_000));
        assert!((8_000..15_000).contains(&state.decision_cooldown_ms));
    }

    #[test]
    fn hungry_creature_hunts_and_requests_scan() {
        let config = EngineConfig::default();
        let mut state = PetState::new(Millis::ZERO, Traits::default(), &config);
        state.stats = Stats::new(10, 70, 100);
        state.mood = Mood::Hungry;
        let mut rng = SmallRng::seed_from_u64(42);

        assert_eq!(
            decide(&mut state, Millis(10_000), &config, &mut rng),
            Some(Activity::Hunt)
        );
        assert_eq!(state.activity(), Activity::Hunt);
        assert_eq!(state.poll_event(), Some(Event::WifiRequest));
    }

    #[test]
    fn exhausted_creature_rests() {
        let config = EngineConfig::default();
        let traits = Traits {
            curiosity: 40,
            activity: 50,
            stress: 80,
        };
        let mut state = PetState::new(Millis::ZERO, traits, &config);
        state.stats = Stats::new(100, 70, 5);
        let mut rng = SmallRng::seed_from_u64(3);

        assert_eq!(
            decide(&mut state, Millis(10_000), &config, &mut rng),
            Some(Activity::Rest)
        );
        assert_eq!(state.rest_phase(), RestPhase::Enter);
        assert!((5_000..15_000).contains(&state.rest_duration_ms()));
        assert_eq!(state.poll_event(), Some(Event::RestStart));
    }

    #[test]
    fn busy_creature_is_not_interrupted() {
        let config = EngineConfig::default();
        let mut state = PetState::new(Millis::ZERO, Traits::default(), &config);
        state.activity = Activity::Discover;
        let mut rng = SmallRng::seed_from_u64(9);

        assert_eq!(decide(&mut state, Millis(60_000), &config, &mut rng), None);
        assert_eq!(state.decision_timer.last(), Millis::ZERO);
    }
}
