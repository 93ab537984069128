//! Hunt and Discover resolution.
//!
//! Both activities wait for a scan. Once a snapshot is injected and marked
//! ready, the next tick turns it into stat deltas here. The reward
//! formulas are pure functions of the snapshot; [`resolve_pending`] applies
//! them to the state.

use tamafi_types::{Activity, EnvironmentSnapshot, Event, NO_SIGNAL_DBM};
use tracing::info;

use crate::clock::Millis;
use crate::config::EngineConfig;
use crate::state::PetState;

/// Frames in the feed-effect overlay.
pub const FEED_EFFECT_FRAMES: u8 = 4;

/// Stat deltas and the event produced by one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Added to hunger.
    pub hunger: i32,
    /// Added to happiness.
    pub happiness: i32,
    /// Added to health.
    pub health: i32,
    /// [`Event::GoodFeed`], [`Event::BadFeed`] or [`Event::Discover`].
    pub event: Event,
}

/// Feeding on the networks in range.
///
/// An empty scan starves the creature. Otherwise hunger is restored by
/// count and strength, happiness by variety and average signal, and
/// health by signal quality.
pub fn resolve_hunt(snapshot: &EnvironmentSnapshot) -> Resolution {
    if snapshot.network_count == 0 {
        return Resolution {
            hunger: -15,
            happiness: -10,
            health: -5,
            event: Event::BadFeed,
        };
    }

    let hunger = snapshot
        .network_count
        .saturating_mul(2)
        .saturating_add(snapshot.strong_count.saturating_mul(3))
        .min(35);

    let variety = snapshot
        .hidden_count
        .saturating_mul(2)
        .saturating_add(snapshot.open_count);
    let signal_bonus = snapshot
        .avg_signal
        .saturating_sub(NO_SIGNAL_DBM)
        .saturating_div(3);
    let happiness = variety
        .saturating_mul(3)
        .saturating_add(signal_bonus)
        .min(30);

    let mut health = 0_i32;
    if snapshot.avg_signal > -75 {
        health = health.saturating_add(5);
    }
    if snapshot.avg_signal > -65 {
        health = health.saturating_add(5);
    }
    if snapshot.strong_count > 5 {
        health = health.saturating_add(3);
    }

    Resolution {
        hunger,
        happiness,
        health,
        event: Event::GoodFeed,
    }
}

/// Exploring the networks in range. Hidden and open networks are the most
/// interesting; every trip costs some hunger.
pub fn resolve_discover(snapshot: &EnvironmentSnapshot) -> Resolution {
    if snapshot.network_count == 0 {
        return Resolution {
            hunger: -3,
            happiness: -5,
            health: 0,
            event: Event::BadFeed,
        };
    }

    let curiosity = snapshot
        .hidden_count
        .saturating_mul(4)
        .saturating_add(snapshot.open_count.saturating_mul(3))
        .saturating_add(snapshot.network_count);

    Resolution {
        hunger: -5,
        happiness: curiosity.saturating_div(2).min(35),
        health: 0,
        event: Event::Discover,
    }
}

/// Resolve a Hunt or Discover whose scan has arrived.
///
/// Returns the activity that finished, or `None` when nothing was waiting.
/// Afterwards the creature is idle, the snapshot is consumed and
/// [`Event::ActivityEnd`] follows the outcome event.
pub fn resolve_pending(state: &mut PetState, now: Millis) -> Option<Activity> {
    let activity = state.activity;
    if !activity.needs_scan() || !state.environment.ready {
        return None;
    }

    let snapshot = state.environment.snapshot;
    let resolution = match activity {
        Activity::Hunt => resolve_hunt(&snapshot),
        Activity::Discover => resolve_discover(&snapshot),
        Activity::None | Activity::Rest => return None,
    };

    state.stats.adjust_hunger(resolution.hunger);
    state.stats.adjust_happiness(resolution.happiness);
    state.stats.adjust_health(resolution.health);
    state.emit(resolution.event);

    if activity == Activity::Hunt {
        state.feed_effect.active = true;
        state.feed_effect.frame = 0;
        state.feed_effect.frame_timer.restart(now);
    }

    info!(
        %activity,
        networks = snapshot.network_count,
        hunger_delta = resolution.hunger,
        happiness_delta = resolution.happiness,
        health_delta = resolution.health,
        outcome = ?resolution.event,
        "Activity resolved"
    );

    state.activity = Activity::None;
    state.environment.ready = false;
    state.emit(Event::ActivityEnd);
    Some(activity)
}

/// Advance the feed-effect overlay by at most one frame.
pub fn step_feed_effect(state: &mut PetState, now: Millis, config: &EngineConfig) {
    let effect = &mut state.feed_effect;
    if !effect.active || !effect.frame_timer.fire(now, config.feed_frame_ms) {
        return;
    }
    effect.frame = effect.frame.saturating_add(1);
    if effect.frame >= FEED_EFFECT_FRAMES {
        effect.active = false;
    }
}
