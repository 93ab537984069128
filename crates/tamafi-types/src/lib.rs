//! Shared type definitions for the TamaFi pet simulation.
//!
//! This crate is the single source of truth for the plain data that flows
//! between the behaviour engine (`tamafi-core`) and the device host
//! (`tamafi-host`). Nothing here performs I/O or reads a clock.
//!
//! # Modules
//!
//! - [`enums`] -- Life stage, mood, activity, rest phase, commands, events
//! - [`structs`] -- Stats, age counters, personality traits
//! - [`environment`] -- Network readings and the aggregated environment snapshot

pub mod enums;
pub mod environment;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Activity, Command, Event, Mood, RestPhase, Stage};
pub use environment::{
    AuthMode, EnvironmentSnapshot, NO_SIGNAL_DBM, NetworkReading, STRONG_SIGNAL_DBM,
};
pub use structs::{Age, STAT_MAX, STAT_MIN, Stats, TRAIT_MAX, Traits, clamp_stat};
