//! The host loop around the engine.
//!
//! [`Host`] plays the role of the device firmware's main loop: it ticks
//! the engine, routes events (scan requests to the scanner, everything else
//! to the log), delivers finished scans, auto-saves, and revives a dead
//! creature after a delay. [`Host::step`] is one iteration at a given time;
//! [`Host::run_virtual`] and [`Host::run_realtime`] drive it.

use std::future::Future;
use std::time::Duration;

use rand::RngCore;
use rand::rngs::SmallRng;
use tamafi_core::{
    BootState, EnvironmentSource, HostConfig, Millis, PersistedRecord, PetEngine, PetState,
    StateStore, TickOutcome, UiSettings,
};
use tamafi_types::{Command, Event, Stage};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::HostError;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// `max_ticks` was reached.
    MaxTicks,
    /// The shutdown signal fired.
    Interrupted,
}

/// Running counters for one host session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Ticks executed.
    pub ticks: u64,
    /// Events drained from the engine.
    pub events: u64,
    /// Scan requests forwarded to the scanner.
    pub scans_requested: u64,
    /// Snapshots injected into the engine.
    pub scans_delivered: u64,
    /// Records written to the store.
    pub saves: u64,
    /// Deaths observed.
    pub deaths: u64,
    /// Automatic revivals issued.
    pub revivals: u64,
}

/// Result of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Why the run stopped.
    pub end_reason: EndReason,
    /// Session counters.
    pub totals: RunTotals,
    /// Life stage at the end.
    pub stage: Stage,
    /// Whether the creature ended the run dead.
    pub dead: bool,
}

/// The device host: engine, creature, store and scanner.
#[derive(Debug)]
pub struct Host<S, E, R = SmallRng> {
    engine: PetEngine<R>,
    state: PetState,
    store: S,
    scanner: E,
    settings: UiSettings,
    hatched: bool,
    config: HostConfig,
    last_save: Millis,
    died_at: Option<Millis>,
    totals: RunTotals,
}

impl<S: StateStore, E: EnvironmentSource, R: RngCore> Host<S, E, R> {
    /// Assemble a host around a booted creature.
    pub fn new(
        engine: PetEngine<R>,
        boot: BootState,
        store: S,
        scanner: E,
        config: HostConfig,
        now: Millis,
    ) -> Self {
        let died_at = boot.state.is_dead().then_some(now);
        Self {
            engine,
            state: boot.state,
            store,
            scanner,
            settings: boot.settings,
            hatched: boot.hatched,
            config,
            last_save: now,
            died_at,
            totals: RunTotals::default(),
        }
    }

    /// The creature.
    pub const fn state(&self) -> &PetState {
        &self.state
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Whether the egg has hatched.
    pub const fn hatched(&self) -> bool {
        self.hatched
    }

    /// One loop iteration at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Persist`] if an auto-save fails.
    pub fn step(&mut self, now: Millis) -> Result<TickOutcome, HostError> {
        let outcome = self.engine.tick(&mut self.state, now, self.config.autonomous);
        self.totals.ticks = self.totals.ticks.saturating_add(1);

        if outcome.promoted_to.is_some() || outcome.died {
            debug!(?outcome, "Notable tick");
        }

        while let Some(event) = self.state.poll_event() {
            self.handle_event(event, now);
        }

        if let Some(snapshot) = self.scanner.poll(now) {
            self.state.inject_environment(snapshot, now);
            self.totals.scans_delivered = self.totals.scans_delivered.saturating_add(1);
        }

        if !self.hatched {
            self.hatched = true;
            info!("Egg hatched");
        }

        if now.since(self.last_save) >= self.settings.auto_save_ms() {
            self.save(now)?;
        }

        self.maybe_revive(now);
        Ok(outcome)
    }

    fn handle_event(&mut self, event: Event, now: Millis) {
        self.totals.events = self.totals.events.saturating_add(1);
        match event {
            Event::WifiRequest => {
                self.scanner.request_scan(now);
                self.totals.scans_requested = self.totals.scans_requested.saturating_add(1);
            }
            Event::Death => {
                self.died_at = Some(now);
                self.totals.deaths = self.totals.deaths.saturating_add(1);
            }
            Event::GoodFeed
            | Event::BadFeed
            | Event::Discover
            | Event::Evolution
            | Event::RestStart
            | Event::RestEnd
            | Event::ActivityEnd => {}
        }

        let stats = self.state.stats();
        info!(
            ?event,
            at_ms = now.as_u32(),
            hunger = stats.hunger(),
            happiness = stats.happiness(),
            health = stats.health(),
            mood = %self.state.mood(),
            stage = %self.state.stage(),
            "Pet event"
        );
    }

    fn maybe_revive(&mut self, now: Millis) {
        let Some(died_at) = self.died_at else {
            return;
        };
        if !self.state.is_dead() {
            self.died_at = None;
            return;
        }
        if self.config.revive_after_ms == 0 || now.since(died_at) < self.config.revive_after_ms {
            return;
        }
        // A dropped command is retried on the next step.
        if self.state.send_command(Command::ResetFull) {
            info!(dead_for_ms = now.since(died_at), "Reviving creature with a full reset");
            self.totals.revivals = self.totals.revivals.saturating_add(1);
            self.died_at = None;
        }
    }

    /// Flush queued commands and write the creature to the store.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Persist`] if the store rejects the write.
    pub fn save(&mut self, now: Millis) -> Result<(), HostError> {
        self.engine.flush_commands(&mut self.state, now);
        let record = PersistedRecord::capture(&self.state, self.settings, self.hatched);
        self.store.save(&record)?;
        self.last_save = now;
        self.totals.saves = self.totals.saves.saturating_add(1);
        info!(
            hunger = record.hunger,
            happiness = record.happiness,
            health = record.health,
            stage = record.stage,
            "State saved"
        );
        Ok(())
    }

    fn limit_reached(&self) -> bool {
        self.config.max_ticks > 0 && self.totals.ticks >= self.config.max_ticks
    }

    fn finish(&mut self, now: Millis, end_reason: EndReason) -> Result<RunSummary, HostError> {
        self.save(now)?;
        let summary = RunSummary {
            end_reason,
            totals: self.totals,
            stage: self.state.stage(),
            dead: self.state.is_dead(),
        };
        info!(
            ?end_reason,
            ticks = summary.totals.ticks,
            events = summary.totals.events,
            scans_delivered = summary.totals.scans_delivered,
            deaths = summary.totals.deaths,
            revivals = summary.totals.revivals,
            dead = summary.dead,
            stage = %summary.stage,
            "Run finished"
        );
        Ok(summary)
    }

    /// Run without sleeping, advancing the clock by one tick interval per
    /// iteration from `start`, until `max_ticks`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Persist`] if a save fails.
    pub fn run_virtual(&mut self, start: Millis) -> Result<RunSummary, HostError> {
        info!(
            max_ticks = self.config.max_ticks,
            tick_interval_ms = self.config.tick_interval_ms,
            "Virtual-time run starting"
        );
        let mut now = start;
        while !self.limit_reached() {
            now = now.offset(self.config.tick_interval_ms);
            self.step(now)?;
        }
        self.finish(now, EndReason::MaxTicks)
    }

    /// Run against the wall clock until `max_ticks` or `shutdown`
    /// completes. Timestamps are milliseconds since `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Persist`] if a save fails.
    pub async fn run_realtime<F>(
        &mut self,
        origin: Instant,
        shutdown: F,
    ) -> Result<RunSummary, HostError>
    where
        F: Future<Output = ()>,
    {
        let period = Duration::from_millis(u64::from(self.config.tick_interval_ms));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            max_ticks = self.config.max_ticks,
            tick_interval_ms = self.config.tick_interval_ms,
            "Real-time run starting"
        );

        let end_reason = loop {
            tokio::select! {
                () = &mut shutdown => {
                    warn!("Shutdown requested");
                    break EndReason::Interrupted;
                }
                _ = interval.tick() => {
                    self.step(uptime(origin))?;
                    if self.limit_reached() {
                        break EndReason::MaxTicks;
                    }
                }
            }
        };

        self.finish(uptime(origin), end_reason)
    }
}

/// Milliseconds since `origin`, folded into the device clock.
pub fn uptime(origin: Instant) -> Millis {
    let elapsed = u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX);
    Millis::from_u64_wrapping(elapsed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tamafi_core::{EngineConfig, FixedEnvironmentSource, MemoryStore};
    use tamafi_types::EnvironmentSnapshot;

    use super::*;

    fn config(max_ticks: u64, autonomous: bool) -> HostConfig {
        HostConfig {
            seed: Some(17),
            realtime: false,
            max_ticks,
            autonomous,
            ..HostConfig::default()
        }
    }

    fn busy() -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            network_count: 6,
            strong_count: 2,
            hidden_count: 1,
            open_count: 1,
            secured_count: 5,
            avg_signal: -68,
        }
    }

    fn host_with(
        record: Option<PersistedRecord>,
        config: HostConfig,
    ) -> Host<MemoryStore, FixedEnvironmentSource> {
        let mut engine = PetEngine::seeded(EngineConfig::default(), 17).unwrap();
        let mut store = record.map_or_else(MemoryStore::new, MemoryStore::with_record);
        let boot = engine.boot(&mut store, Millis::ZERO).unwrap();
        Host::new(
            engine,
            boot,
            store,
            FixedEnvironmentSource::new(busy()),
            config,
            Millis::ZERO,
        )
    }

    fn record_with_stats(hunger: i32, happiness: i32, health: i32) -> PersistedRecord {
        let state = PetEngine::seeded(EngineConfig::default(), 1)
            .unwrap()
            .init(Millis::ZERO);
        let mut record = PersistedRecord::capture(&state, UiSettings::default(), true);
        record.hunger = hunger;
        record.happiness = happiness;
        record.health = health;
        record
    }

    #[test]
    fn virtual_run_stops_at_max_ticks_and_saves() {
        let mut host = host_with(None, config(50, true));

        let summary = host.run_virtual(Millis::ZERO).unwrap();

        assert_eq!(summary.end_reason, EndReason::MaxTicks);
        assert_eq!(summary.totals.ticks, 50);
        assert_eq!(summary.totals.saves, 1);
        // First-boot defaults plus the final save.
        assert_eq!(host.store().saves(), 2);
        assert!(host.store().record().unwrap().hatched);
    }

    #[test]
    fn scan_requests_reach_the_scanner_and_come_back() {
        // Hunt is chosen at 10 s and resolved on the following tick.
        let mut host = host_with(Some(record_with_stats(10, 70, 90)), config(101, true));

        let totals = host.run_virtual(Millis::ZERO).unwrap().totals;

        assert_eq!(totals.scans_requested, 1);
        assert_eq!(totals.scans_delivered, 1);
        // Decayed 10 -> 6, then fed min(35, 2 * 6 + 3 * 2).
        assert_eq!(host.state().stats().hunger(), 24);
    }

    #[test]
    fn auto_save_follows_the_stored_interval() {
        let mut host = host_with(None, config(0, false));

        let mut now = Millis::ZERO;
        for _ in 0..305 {
            now = now.offset(100);
            host.step(now).unwrap();
        }

        // First-boot defaults plus one auto-save at 30 s.
        assert_eq!(host.store().saves(), 2);
    }

    #[test]
    fn dead_creature_is_revived_after_delay() {
        let mut host = host_with(Some(record_with_stats(2, 3, 2)), config(400, false));

        let totals = host.run_virtual(Millis::ZERO).unwrap().totals;

        assert_eq!(totals.deaths, 1);
        assert_eq!(totals.revivals, 1);
        assert!(!host.state().is_dead());
        assert_eq!(host.state().stage(), Stage::Baby);
    }

    #[test]
    fn revive_waits_for_room_in_the_command_queue() {
        let mut host = host_with(Some(record_with_stats(2, 3, 2)), config(0, false));
        host.step(Millis(70_000)).unwrap();
        assert!(host.state().is_dead());
        assert_eq!(host.died_at, Some(Millis(70_000)));

        while host.state.send_command(Command::Reset) {}
        host.maybe_revive(Millis(80_000));

        assert_eq!(host.died_at, Some(Millis(70_000)));
        assert_eq!(host.totals.revivals, 0);

        // The queued resets revive it instead; no full reset follows.
        host.step(Millis(80_100)).unwrap();
        assert!(!host.state().is_dead());
        assert_eq!(host.died_at, None);
        assert_eq!(host.totals.revivals, 0);
    }

    #[test]
    fn revival_can_be_disabled() {
        let config = HostConfig {
            revive_after_ms: 0,
            ..config(400, false)
        };
        let mut host = host_with(Some(record_with_stats(2, 3, 2)), config);

        let summary = host.run_virtual(Millis::ZERO).unwrap();

        assert!(summary.dead);
        assert_eq!(summary.totals.revivals, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn realtime_run_honours_shutdown() {
        let config = HostConfig {
            realtime: true,
            ..config(0, true)
        };
        let mut host = host_with(None, config);

        let shutdown = tokio::time::sleep(Duration::from_millis(1_050));
        let summary = host.run_realtime(Instant::now(), shutdown).await.unwrap();

        assert_eq!(summary.end_reason, EndReason::Interrupted);
        assert!(summary.totals.ticks >= 10);
    }
}
