//! Rest sub-machine: Enter -> Deep -> Wake -> idle.
//!
//! - **Enter** counts the animation frame down from 4 to 0, one step per
//!   frame period, then moves to Deep.
//! - **Deep** applies a one-off recovery bonus at the midpoint of the rest
//!   duration and emits [`Event::RestEnd`] when the full duration has
//!   passed.
//! - **Wake** counts the frame back up to 4, then returns the creature to
//!   idle and emits [`Event::ActivityEnd`].
//!
//! Only the decision engine starts a rest. Reset commands abort it.

use tamafi_types::{Activity, Event, RestPhase};
use tracing::{debug, info};

use crate::clock::Millis;
use crate::config::EngineConfig;
use crate::state::PetState;

/// Frame index at the top of the enter/wake animation.
pub const REST_TOP_FRAME: u8 = 4;

/// Hunger added by the deep-rest bonus.
const BONUS_HUNGER: i32 = -3;

/// Happiness added by the deep-rest bonus.
const BONUS_HAPPINESS: i32 = 10;

/// Health added by the deep-rest bonus.
const BONUS_HEALTH: i32 = 15;

/// Put the creature to rest for `duration_ms` of deep sleep.
pub fn begin_rest(state: &mut PetState, now: Millis, duration_ms: u32) {
    state.activity = Activity::Rest;
    let rest = &mut state.rest;
    rest.phase = RestPhase::Enter;
    rest.frame = REST_TOP_FRAME;
    rest.frame_timer.restart(now);
    rest.phase_started = now;
    rest.duration_ms = duration_ms;
    rest.bonus_applied = false;
    state.emit(Event::RestStart);

    info!(duration_ms, "Rest started");
}

/// Advance the rest sub-machine. Does nothing unless resting.
pub fn step_rest(state: &mut PetState, now: Millis, config: &EngineConfig) {
    if state.activity != Activity::Rest {
        return;
    }

    match state.rest.phase {
        RestPhase::None => {}
        RestPhase::Enter => {
            if !state.rest.frame_timer.fire(now, config.rest_frame_ms) {
                return;
            }
            if state.rest.frame > 0 {
                state.rest.frame = state.rest.frame.saturating_sub(1);
            } else {
                state.rest.phase = RestPhase::Deep;
                state.rest.phase_started = now;
                state.rest.bonus_applied = false;
                debug!("Rest entered deep phase");
            }
        }
        RestPhase::Deep => {
            let elapsed = now.since(state.rest.phase_started);
            let midpoint = state.rest.duration_ms.saturating_div(2);

            if !state.rest.bonus_applied && elapsed >= midpoint {
                state.stats.adjust_hunger(BONUS_HUNGER);
                state.stats.adjust_happiness(BONUS_HAPPINESS);
                state.stats.adjust_health(BONUS_HEALTH);
                state.rest.bonus_applied = true;
                debug!(
                    hunger = state.stats.hunger(),
                    happiness = state.stats.happiness(),
                    health = state.stats.health(),
                    "Rest bonus applied"
                );
            }

            if elapsed >= state.rest.duration_ms {
                state.rest.phase = RestPhase::Wake;
                state.rest.phase_started = now;
                state.rest.frame_timer.restart(now);
                state.rest.frame = 0;
                state.emit(Event::RestEnd);
            }
        }
        RestPhase::Wake => {
            if !state.rest.frame_timer.fire(now, config.rest_frame_ms) {
                return;
            }
            if state.rest.frame < REST_TOP_FRAME {
                state.rest.frame = state.rest.frame.saturating_add(1);
            } else {
                state.clear_activity();
                state.emit(Event::ActivityEnd);
                info!("Rest finished");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use tamafi_types::{Stats, Traits};

    use super::*;

    fn resting(duration_ms: u32) -> (PetState, EngineConfig) {
        let config = EngineConfig::default();
        let mut state = PetState::new(Millis::ZERO, Traits::default(), &config);
        begin_rest(&mut state, Millis::ZERO, duration_ms);
        (state, config)
    }

    /// Step every 400 ms from `from` until the phase changes.
    fn step_until_phase_changes(state: &mut PetState, config: &EngineConfig, from: u32) -> u32 {
        let start = state.rest_phase();
        let mut now = from;
        while state.rest_phase() == start {
            now = now.saturating_add(config.rest_frame_ms);
            step_rest(state, Millis(now), config);
        }
        now
    }

    #[test]
    fn begin_rest_enters_with_top_frame() {
        let (mut state, _) = resting(10_000);
        assert_eq!(state.activity(), Activity::Rest);
        assert_eq!(state.rest_phase(), RestPhase::Enter);
        assert_eq!(state.rest_frame(), 4);
        assert_eq!(state.poll_event(), Some(Event::RestStart));
    }

    #[test]
    fn enter_counts_down_then_goes_deep() {
        let (mut state, config) = resting(10_000);
        step_rest(&mut state, Millis(399), &config);
        assert_eq!(state.rest_frame(), 4);

        for (at, frame) in [(400, 3), (800, 2), (1_200, 1), (1_600, 0)] {
            step_rest(&mut state, Millis(at), &config);
            assert_eq!(state.rest_frame(), frame);
            assert_eq!(state.rest_phase(), RestPhase::Enter);
        }
        step_rest(&mut state, Millis(2_000), &config);
        assert_eq!(state.rest_phase(), RestPhase::Deep);
        assert_eq!(state.rest.phase_started, Millis(2_000));
    }

    #[test]
    fn deep_rest_bonus_at_midpoint_once() {
        let (mut state, config) = resting(10_000);
        let deep_at = step_until_phase_changes(&mut state, &config, 0);

        step_rest(&mut state, Millis(deep_at + 4_999), &config);
        assert_eq!(state.stats(), Stats::seeded());

        step_rest(&mut state, Millis(deep_at + 5_000), &config);
        assert_eq!(state.stats(), Stats::new(67, 80, 85));

        step_rest(&mut state, Millis(deep_at + 6_000), &config);
        assert_eq!(state.stats(), Stats::new(67, 80, 85));
        assert_eq!(state.rest_phase(), RestPhase::Deep);
    }

    #[test]
    fn deep_rest_ends_after_full_duration() {
        let (mut state, config) = resting(10_000);
        let deep_at = step_until_phase_changes(&mut state, &config, 0);
        let _ = state.poll_event();

        step_rest(&mut state, Millis(deep_at + 9_999), &config);
        assert_eq!(state.rest_phase(), RestPhase::Deep);

        step_rest(&mut state, Millis(deep_at + 10_000), &config);
        assert_eq!(state.rest_phase(), RestPhase::Wake);
        assert_eq!(state.rest_frame(), 0);
        assert_eq!(state.poll_event(), Some(Event::RestEnd));
    }

    #[test]
    fn wake_counts_up_then_goes_idle() {
        let (mut state, config) = resting(5_000);
        let deep_at = step_until_phase_changes(&mut state, &config, 0);
        let wake_at = deep_at + 5_000;
        step_rest(&mut state, Millis(wake_at), &config);
        assert_eq!(state.rest_phase(), RestPhase::Wake);

        for (i, frame) in (1..=4).enumerate() {
            let at = wake_at + 400 * (u32::try_from(i).unwrap() + 1);
            step_rest(&mut state, Millis(at), &config);
            assert_eq!(state.rest_frame(), frame);
            assert_eq!(state.activity(), Activity::Rest);
        }

        step_rest(&mut state, Millis(wake_at + 2_000), &config);
        assert_eq!(state.activity(), Activity::None);
        assert_eq!(state.rest_phase(), RestPhase::None);

        let events: Vec<Event> = std::iter::from_fn(|| state.poll_event()).collect();
        assert_eq!(
            events,
            vec![Event::RestStart, Event::RestEnd, Event::ActivityEnd]
        );
    }

    #[test]
    fn idle_creature_is_untouched() {
        let config = EngineConfig::default();
        let mut state = PetState::new(Millis::ZERO, Traits::default(), &config);
        step_rest(&mut state, Millis(50_000), &config);
        assert_eq!(state.activity(), Activity::None);
        assert_eq!(state.pending_events(), 0);
    }
}
