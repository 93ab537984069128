//! Life-stage promotion.
//!
//! Stages only move forward. A promotion needs both enough total age and a
//! healthy enough stat average; the oldest eligible stage wins, so a
//! creature restored with a large age may skip stages.

use tamafi_types::{Age, Event, Stage, Stats};
use tracing::info;

use crate::state::PetState;

/// Age and average-stat gates, oldest stage first.
const GATES: [(Stage, u64, i32); 3] = [
    (Stage::Elder, 180, 40),
    (Stage::Adult, 60, 45),
    (Stage::Teen, 20, 35),
];

/// The stage `stage` should be promoted to, if any.
pub fn next_stage(stats: &Stats, age: &Age, stage: Stage) -> Option<Stage> {
    let minutes = age.total_minutes();
    let avg = stats.average();
    GATES
        .iter()
        .find(|&&(target, min_age, min_avg)| minutes >= min_age && avg > min_avg && stage < target)
        .map(|&(target, _, _)| target)
}

/// Promote the creature if it qualifies, emitting one
/// [`Event::Evolution`] per transition.
pub fn apply_evolution(state: &mut PetState) -> Option<Stage> {
    let target = next_stage(&state.stats, &state.age, state.stage)?;
    info!(
        from = %state.stage,
        to = %target,
        age_minutes = state.age.total_minutes(),
        avg = state.stats.average(),
        "Creature evolved"
    );
    state.stage = target;
    state.emit(Event::Evolution);
    Some(target)
}

#[cfg(test)]
mod tests {
    use tamafi_types::Traits;

    use super::*;
    use crate::clock::Millis;
    use crate::config::EngineConfig;

    const fn minutes(total: u32) -> Age {
        Age::new(total, 0, 0)
    }

    #[test]
    fn baby_becomes_teen_at_twenty_minutes() {
        let stats = Stats::new(36, 36, 36);
        assert_eq!(next_stage(&stats, &minutes(19), Stage::Baby), None);
        assert_eq!(
            next_stage(&stats, &minutes(20), Stage::Baby),
            Some(Stage::Teen)
        );
    }

    #[test]
    fn average_must_strictly_exceed_gate() {
        let stats = Stats::new(35, 35, 35);
        assert_eq!(next_stage(&stats, &minutes(20), Stage::Baby), None);
    }

    #[test]
    fn adult_needs_an_hour_of_age() {
        let stats = Stats::new(46, 46, 46);
        assert_eq!(
            next_stage(&stats, &minutes(59), Stage::Teen),
            None,
            "already teen, not old enough for adult"
        );
        assert_eq!(
            next_stage(&stats, &minutes(60), Stage::Teen),
            Some(Stage::Adult)
        );
    }

    #[test]
    fn weak_stats_hold_back_adult_but_not_teen() {
        let stats = Stats::new(40, 40, 40);
        assert_eq!(
            next_stage(&stats, &minutes(90), Stage::Baby),
            Some(Stage::Teen)
        );
        assert_eq!(next_stage(&stats, &minutes(90), Stage::Teen), None);
    }

    #[test]
    fn elder_reached_after_three_hours() {
        let stats = Stats::new(41, 41, 41);
        assert_eq!(
            next_stage(&stats, &Age::new(0, 3, 0), Stage::Adult),
            Some(Stage::Elder)
        );
        assert_eq!(next_stage(&stats, &Age::new(0, 3, 0), Stage::Elder), None);
    }

    #[test]
    fn stage_never_moves_backward() {
        let stats = Stats::new(0, 0, 0);
        assert_eq!(next_stage(&stats, &minutes(0), Stage::Elder), None);
    }

    #[test]
    fn promotion_emits_one_event() {
        let mut state = PetState::new(Millis::ZERO, Traits::default(), &EngineConfig::default());
        state.age = minutes(25);

        assert_eq!(apply_evolution(&mut state), Some(Stage::Teen));
        assert_eq!(apply_evolution(&mut state), None);

        assert_eq!(state.stage(), Stage::Teen);
        assert_eq!(state.poll_event(), Some(Event::Evolution));
        assert_eq!(state.poll_event(), None);
    }
}
