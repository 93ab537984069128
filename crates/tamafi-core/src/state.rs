//! The aggregate pet state record.
//!
//! [`PetState`] holds everything the engine reads and mutates: stats, age,
//! stage, personality, the per-channel timers, the rest sub-machine, the
//! last environment snapshot, and the two ring queues. The caller owns it
//! and hands it to the engine by reference on every call; the engine keeps
//! no state of its own apart from configuration and its RNG.
//!
//! Fields are crate-private so the cross-field invariants hold:
//! - `rest.phase != RestPhase::None` implies `activity == Activity::Rest`
//! - `dead` implies `activity == Activity::None` and no rest phase

use rand::Rng;
use tamafi_types::{
    Activity, Age, Command, EnvironmentSnapshot, Event, Mood, RestPhase, Stage, Stats, Traits,
};
use tracing::{debug, warn};

use crate::clock::{Millis, Timer};
use crate::config::EngineConfig;
use crate::queue::RingQueue;

/// The four decay timers, one per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecayTimers {
    pub(crate) hunger: Timer,
    pub(crate) happiness: Timer,
    pub(crate) health: Timer,
    pub(crate) age: Timer,
}

impl DecayTimers {
    pub(crate) const fn started(now: Millis) -> Self {
        Self {
            hunger: Timer::started(now),
            happiness: Timer::started(now),
            health: Timer::started(now),
            age: Timer::started(now),
        }
    }
}

/// Bookkeeping of the rest sub-machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RestMachine {
    pub(crate) phase: RestPhase,
    /// Animation frame: counts 4 -> 0 while entering, 0 -> 4 while waking.
    pub(crate) frame: u8,
    pub(crate) frame_timer: Timer,
    pub(crate) phase_started: Millis,
    pub(crate) duration_ms: u32,
    pub(crate) bonus_applied: bool,
}

impl RestMachine {
    pub(crate) const fn idle(now: Millis) -> Self {
        Self {
            phase: RestPhase::None,
            frame: 0,
            frame_timer: Timer::started(now),
            phase_started: now,
            duration_ms: 0,
            bonus_applied: false,
        }
    }
}

/// Short overlay played after a hunt resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FeedEffect {
    pub(crate) active: bool,
    pub(crate) frame: u8,
    pub(crate) frame_timer: Timer,
}

impl FeedEffect {
    pub(crate) const fn idle(now: Millis) -> Self {
        Self {
            active: false,
            frame: 0,
            frame_timer: Timer::started(now),
        }
    }
}

/// The last environment snapshot and when it arrived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvironmentRecord {
    /// The most recent snapshot (empty until the first scan completes).
    pub snapshot: EnvironmentSnapshot,
    /// When the most recent scan was injected. `None` before any scan.
    pub scanned_at: Option<Millis>,
    /// Set on injection, cleared when a Hunt/Discover consumes the snapshot.
    pub ready: bool,
}

impl EnvironmentRecord {
    /// Milliseconds since the last scan. Before any scan this is the time
    /// since the clock origin.
    pub const fn since_scan(&self, now: Millis) -> u32 {
        match self.scanned_at {
            Some(at) => now.since(at),
            None => now.since(Millis::ZERO),
        }
    }

    /// No network is known and the air has been silent longer than
    /// `threshold_ms`.
    pub const fn silent_for(&self, now: Millis, threshold_ms: u32) -> bool {
        self.snapshot.is_empty() && self.since_scan(now) > threshold_ms
    }
}

/// Complete state of one creature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetState {
    pub(crate) stats: Stats,
    pub(crate) age: Age,
    pub(crate) stage: Stage,
    pub(crate) mood: Mood,
    pub(crate) activity: Activity,
    pub(crate) traits: Traits,
    pub(crate) timers: DecayTimers,
    pub(crate) rest: RestMachine,
    pub(crate) feed_effect: FeedEffect,
    pub(crate) decision_timer: Timer,
    pub(crate) decision_cooldown_ms: u32,
    pub(crate) environment: EnvironmentRecord,
    pub(crate) dead: bool,
    pub(crate) commands: RingQueue<Command>,
    pub(crate) events: RingQueue<Event>,
}

impl PetState {
    /// A freshly created creature: stats 70/70/70, age zero, [`Stage::Baby`],
    /// idle, with the given personality.
    pub fn new(now: Millis, traits: Traits, config: &EngineConfig) -> Self {
        Self {
            stats: Stats::seeded(),
            age: Age::default(),
            stage: Stage::Baby,
            mood: Mood::Calm,
            activity: Activity::None,
            traits,
            timers: DecayTimers::started(now),
            rest: RestMachine::idle(now),
            feed_effect: FeedEffect::idle(now),
            decision_timer: Timer::started(now),
            decision_cooldown_ms: config.initial_decision_ms,
            environment: EnvironmentRecord::default(),
            dead: false,
            commands: RingQueue::new(),
            events: RingQueue::new(),
        }
    }

    // --- Read access ---

    /// Current stats.
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// Current age.
    pub const fn age(&self) -> Age {
        self.age
    }

    /// Current life stage.
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Mood computed on the most recent tick.
    pub const fn mood(&self) -> Mood {
        self.mood
    }

    /// Current activity.
    pub const fn activity(&self) -> Activity {
        self.activity
    }

    /// Current rest phase ([`RestPhase::None`] unless resting).
    pub const fn rest_phase(&self) -> RestPhase {
        self.rest.phase
    }

    /// Rest animation frame, for the renderer.
    pub const fn rest_frame(&self) -> u8 {
        self.rest.frame
    }

    /// Duration of the current (or last) deep rest.
    pub const fn rest_duration_ms(&self) -> u32 {
        self.rest.duration_ms
    }

    /// Feed-effect overlay frame while it plays, `None` otherwise.
    pub const fn feed_effect_frame(&self) -> Option<u8> {
        if self.feed_effect.active {
            Some(self.feed_effect.frame)
        } else {
            None
        }
    }

    /// Personality traits.
    pub const fn traits(&self) -> Traits {
        self.traits
    }

    /// The last environment snapshot and its timing.
    pub const fn environment(&self) -> &EnvironmentRecord {
        &self.environment
    }

    /// Whether the creature has died.
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Number of events waiting to be polled.
    pub const fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Events dropped because the event queue was full.
    pub const fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }

    /// Commands dropped because the command queue was full.
    pub const fn dropped_commands(&self) -> u64 {
        self.commands.dropped()
    }

    // --- Caller-facing queue operations ---

    /// Queue a command; it runs on the next tick or flush.
    ///
    /// Returns `false` if the command queue was full and it was dropped.
    pub fn send_command(&mut self, command: Command) -> bool {
        let accepted = self.commands.push(command);
        if !accepted {
            warn!(
                ?command,
                dropped_total = self.commands.dropped(),
                "Command queue full, dropping newest"
            );
        }
        accepted
    }

    /// Dequeue the oldest event, or `None` when there is nothing to report.
    pub fn poll_event(&mut self) -> Option<Event> {
        self.events.pop()
    }

    /// Record a completed scan and mark it ready for consumption.
    ///
    /// The snapshot is trusted as-is.
    pub fn inject_environment(&mut self, snapshot: EnvironmentSnapshot, now: Millis) {
        debug!(
            networks = snapshot.network_count,
            strong = snapshot.strong_count,
            hidden = snapshot.hidden_count,
            open = snapshot.open_count,
            avg_signal = snapshot.avg_signal,
            "Environment snapshot injected"
        );
        self.environment = EnvironmentRecord {
            snapshot,
            scanned_at: Some(now),
            ready: true,
        };
    }

    // --- Engine internals ---

    /// Push an event, logging when the queue overflows.
    pub(crate) fn emit(&mut self, event: Event) {
        if !self.events.push(event) {
            warn!(
                ?event,
                dropped_total = self.events.dropped(),
                "Event queue full, dropping newest"
            );
        }
    }

    /// Leave any activity and rest phase.
    pub(crate) const fn clear_activity(&mut self) {
        self.activity = Activity::None;
        self.rest.phase = RestPhase::None;
    }

    /// Apply a `Reset` (`full == None`) or `ResetFull` command.
    ///
    /// Both reseed the stats, forget the environment, clear any activity,
    /// revive the creature and restart every timer at `now`. A full reset
    /// additionally zeroes the age, returns to [`Stage::Baby`] and installs
    /// `fresh_traits`.
    pub(crate) fn reset(&mut self, now: Millis, full: Option<Traits>) {
        self.stats = Stats::seeded();

        if let Some(traits) = full {
            self.age = Age::default();
            self.stage = Stage::Baby;
            self.traits = traits;
        }

        self.environment = EnvironmentRecord::default();
        self.clear_activity();
        self.feed_effect.active = false;
        self.dead = false;

        self.timers = DecayTimers::started(now);
        self.decision_timer.restart(now);
    }
}

/// Roll a fresh personality.
///
/// Curiosity is drawn from `[40, 90)`, activity from `[30, 90)` and stress
/// from `[20, 80)`.
pub fn roll_traits<R: Rng>(rng: &mut R) -> Traits {
    Traits {
        curiosity: rng.random_range(40..90),
        activity: rng.random_range(30..90),
        stress: rng.random_range(20..80),
    }
}
