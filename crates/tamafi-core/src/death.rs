//! Death condition and consequences.
//!
//! The creature dies only when hunger, happiness and health all reach zero
//! at once. A dead creature is frozen: the tick cycle skips decay,
//! resolution, rest and decisions until a reset command revives it.

use tamafi_types::{Event, Stats};
use tracing::warn;

use crate::state::PetState;

/// Returns `true` if the stats describe a dead creature.
pub const fn check_death(stats: &Stats) -> bool {
    stats.all_depleted()
}

/// Mark the creature dead, abandon any activity and emit [`Event::Death`].
pub fn process_death(state: &mut PetState) {
    state.dead = true;
    state.clear_activity();
    state.feed_effect.active = false;
    state.emit(Event::Death);

    warn!(
        stage = %state.stage,
        age_minutes = state.age.total_minutes(),
        "Creature died"
    );
}
