//! Behaviour engine for the TamaFi virtual pet.
//!
//! The engine is a pure, hardware-independent state machine. The caller owns
//! a [`PetState`] and advances it with [`PetEngine::tick`], passing the
//! current monotonic time and whether the creature may act on its own.
//! Commands flow in and events flow out through fixed-capacity ring queues
//! stored inside the state. Environment scans are requested through an
//! event and delivered later with [`PetState::inject_environment`].
//!
//! # Tick order
//!
//! 1. Drain queued commands
//! 2. Stop here if the creature is dead
//! 3. Stat decay timers
//! 4. Feed-effect overlay
//! 5. Resolve a completed Hunt/Discover
//! 6. Step the rest sub-machine
//! 7. Recompute mood and life stage
//! 8. Death check
//! 9. Autonomous decision (when permitted and idle)
//!
//! # Modules
//!
//! - [`activity`] -- Hunt/Discover reward and penalty resolution
//! - [`clock`] -- Wraparound-safe millisecond timestamps and timers
//! - [`config`] -- YAML configuration ([`TamafiConfig`])
//! - [`death`] -- Death condition and consequences
//! - [`decay`] -- Per-channel stat decay scheduler
//! - [`decision`] -- Utility-scoring activity picker
//! - [`engine`] -- [`PetEngine`] and the tick cycle
//! - [`environment`] -- Scanner collaborator trait and stub
//! - [`evolution`] -- Life-stage promotion
//! - [`mood`] -- Mood classifier
//! - [`persist`] -- Persisted-state schema and storage collaborator trait
//! - [`queue`] -- Fixed-capacity command/event ring buffer
//! - [`rest`] -- Rest sub-machine
//! - [`state`] -- The aggregate [`PetState`] record

pub mod activity;
pub mod clock;
pub mod config;
pub mod death;
pub mod decay;
pub mod decision;
pub mod engine;
pub mod environment;
pub mod evolution;
pub mod mood;
pub mod persist;
pub mod queue;
pub mod rest;
pub mod state;

// Re-export primary types at crate root for convenience.
pub use clock::{Millis, Timer};
pub use config::{ConfigError, EngineConfig, HostConfig, LoggingConfig, TamafiConfig};
pub use engine::{PetEngine, TickOutcome};
pub use environment::{EnvironmentSource, FixedEnvironmentSource};
pub use persist::{BootState, MemoryStore, PersistError, PersistedRecord, StateStore, UiSettings};
pub use queue::{QUEUE_CAPACITY, RingQueue};
pub use state::{EnvironmentRecord, PetState};
