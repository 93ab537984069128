//! The engine and its tick cycle.
//!
//! [`PetEngine`] owns configuration and a random source and nothing else.
//! All creature state lives in the caller's [`PetState`], so one engine can
//! drive any number of creatures and tests can construct state directly.
//!
//! Each [`tick`](PetEngine::tick) runs the phases listed in the crate docs
//! and returns a [`TickOutcome`] describing what happened.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tamafi_types::{Activity, Command, Stage};
use tracing::{debug, info};

use crate::activity::{resolve_pending, step_feed_effect};
use crate::clock::Millis;
use crate::config::{ConfigError, EngineConfig};
use crate::death::{check_death, process_death};
use crate::decay::apply_decay;
use crate::decision::decide;
use crate::evolution::apply_evolution;
use crate::mood::classify;
use crate::persist::{BootState, PersistError, PersistedRecord, StateStore, UiSettings};
use crate::rest::step_rest;
use crate::state::{PetState, roll_traits};

/// Summary of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Commands drained from the queue at the start of the tick.
    pub commands_processed: u32,
    /// `true` when the creature was already dead and nothing else ran.
    pub skipped_dead: bool,
    /// Hunt or Discover resolved this tick.
    pub resolved: Option<Activity>,
    /// Activity chosen by the decision engine this tick.
    pub started: Option<Activity>,
    /// New life stage reached this tick.
    pub promoted_to: Option<Stage>,
    /// The creature died this tick.
    pub died: bool,
}

/// The behaviour engine.
#[derive(Debug, Clone)]
pub struct PetEngine<R = SmallRng> {
    config: EngineConfig,
    rng: R,
}

impl PetEngine<SmallRng> {
    /// Engine with a reproducible random stream.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn seeded(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    /// Engine seeded from operating-system entropy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn from_entropy(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, SmallRng::from_os_rng())
    }
}

impl<R: RngCore> PetEngine<R> {
    /// Engine using the given random source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    /// The engine's configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A newborn creature with freshly rolled traits.
    pub fn init(&mut self, now: Millis) -> PetState {
        let traits = roll_traits(&mut self.rng);
        info!(
            curiosity = traits.curiosity,
            activity = traits.activity,
            stress = traits.stress,
            "Creature created"
        );
        PetState::new(now, traits, &self.config)
    }

    /// Restore the stored creature, or create one and store it on first
    /// boot.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the store fails or holds a corrupt
    /// record.
    pub fn boot<S: StateStore + ?Sized>(
        &mut self,
        store: &mut S,
        now: Millis,
    ) -> Result<BootState, PersistError> {
        if let Some(record) = store.load()? {
            let state = record.restore(now, &self.config)?;
            info!(
                stage = %state.stage(),
                hunger = state.stats().hunger(),
                happiness = state.stats().happiness(),
                health = state.stats().health(),
                hatched = record.hatched,
                "Creature restored"
            );
            return Ok(BootState {
                state,
                settings: record.settings,
                hatched: record.hatched,
                first_boot: false,
            });
        }

        let state = self.init(now);
        let settings = UiSettings::default();
        store.save(&PersistedRecord::capture(&state, settings, false))?;
        info!("First boot, defaults stored");
        Ok(BootState {
            state,
            settings,
            hatched: false,
            first_boot: true,
        })
    }

    /// Advance the creature by one step.
    ///
    /// `allow_autonomous` gates the decision phase only; everything else
    /// runs regardless.
    pub fn tick(
        &mut self,
        state: &mut PetState,
        now: Millis,
        allow_autonomous: bool,
    ) -> TickOutcome {
        let mut outcome = TickOutcome {
            commands_processed: self.flush_commands(state, now),
            ..TickOutcome::default()
        };

        if state.dead {
            outcome.skipped_dead = true;
            return outcome;
        }

        apply_decay(state, now, &self.config);
        step_feed_effect(state, now, &self.config);
        outcome.resolved = resolve_pending(state, now);
        step_rest(state, now, &self.config);

        let mood = classify(&state.stats, &state.environment, now, &self.config);
        if mood != state.mood {
            debug!(from = %state.mood, to = %mood, "Mood changed");
            state.mood = mood;
        }
        outcome.promoted_to = apply_evolution(state);

        if check_death(&state.stats) {
            process_death(state);
            outcome.died = true;
            return outcome;
        }

        if allow_autonomous {
            outcome.started = decide(state, now, &self.config, &mut self.rng);
        }

        outcome
    }

    /// Run every queued command now. Returns how many ran.
    pub fn flush_commands(&mut self, state: &mut PetState, now: Millis) -> u32 {
        let mut processed = 0_u32;
        while let Some(command) = state.commands.pop() {
            let fresh_traits = match command {
                Command::Reset => None,
                Command::ResetFull => Some(roll_traits(&mut self.rng)),
            };
            state.reset(now, fresh_traits);
            info!(?command, "Command applied");
            processed = processed.saturating_add(1);
        }
        processed
    }
}
