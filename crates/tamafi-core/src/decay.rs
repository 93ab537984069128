//! Stat decay scheduler.
//!
//! Four independent timers, one per channel. Each fires at most once per
//! tick when its period has elapsed and is then restarted at `now`; missed
//! periods are not caught up.
//!
//! | Channel   | Period   | Step |
//! |-----------|----------|------|
//! | hunger    | 5000 ms  | -2 |
//! | happiness | 7000 ms  | -3 when the air has been silent > 30 s, else -1 |
//! | health    | 10000 ms | -2 when hunger or happiness < 20, else -1 |
//! | age       | 60000 ms | +1 minute with carry |
//!
//! Channels are evaluated in that order, so the health check sees hunger
//! and happiness after their own decay in the same tick.

use tracing::debug;

use crate::clock::Millis;
use crate::config::EngineConfig;
use crate::state::PetState;

/// Hunger lost per hunger period.
const HUNGER_STEP: i32 = 2;

/// Happiness lost per period while networks are around.
const HAPPINESS_STEP: i32 = 1;

/// Happiness lost per period after a long silence.
const HAPPINESS_LONELY_STEP: i32 = 3;

/// Health lost per period while fed and content.
const HEALTH_STEP: i32 = 1;

/// Health lost per period while starving or miserable.
const HEALTH_NEGLECT_STEP: i32 = 2;

/// Hunger or happiness below this makes health decay faster.
const NEGLECT_THRESHOLD: i32 = 20;

/// Which channels fired during one decay pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecayReport {
    /// Hunger decayed.
    pub hunger: bool,
    /// Happiness decayed.
    pub happiness: bool,
    /// Health decayed.
    pub health: bool,
    /// One age minute passed.
    pub aged: bool,
}

impl DecayReport {
    /// Whether any channel fired.
    pub const fn any(self) -> bool {
        self.hunger || self.happiness || self.health || self.aged
    }
}

/// Run every decay timer once. Callers must skip this for a dead creature.
pub fn apply_decay(state: &mut PetState, now: Millis, config: &EngineConfig) -> DecayReport {
    let mut report = DecayReport::default();

    // 1. Hunger
    if state.timers.hunger.fire(now, config.hunger_interval_ms) {
        state.stats.adjust_hunger(HUNGER_STEP.saturating_neg());
        report.hunger = true;
    }

    // 2. Happiness, faster when nothing has been heard for a while
    if state.timers.happiness.fire(now, config.happiness_interval_ms) {
        let step = if state.environment.silent_for(now, config.lonely_after_ms) {
            HAPPINESS_LONELY_STEP
        } else {
            HAPPINESS_STEP
        };
        state.stats.adjust_happiness(step.saturating_neg());
        report.happiness = true;
    }

    // 3. Health, faster when neglected
    if state.timers.health.fire(now, config.health_interval_ms) {
        let neglected = state.stats.hunger() < NEGLECT_THRESHOLD
            || state.stats.happiness() < NEGLECT_THRESHOLD;
        let step = if neglected {
            HEALTH_NEGLECT_STEP
        } else {
            HEALTH_STEP
        };
        state.stats.adjust_health(step.saturating_neg());
        report.health = true;
    }

    // 4. Age
    if state.timers.age.fire(now, config.age_interval_ms) {
        state.age.advance_minute();
        report.aged = true;
    }

    if report.any() {
        debug!(
            hunger = state.stats.hunger(),
            happiness = state.stats.happiness(),
            health = state.stats.health(),
            age_minutes = state.age.minutes,
            "Decay applied"
        );
    }

    report
}
