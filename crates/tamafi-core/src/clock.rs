//! Monotonic millisecond clock values.
//!
//! The device exposes a 32-bit millisecond uptime counter that wraps after
//! roughly 49.7 days. Every elapsed-time comparison in the engine goes
//! through [`Millis::since`], which subtracts under modular arithmetic, so a
//! timer started just before the wrap still fires at the right moment after
//! it.
//!
//! The engine never reads wall time. The caller supplies `now` on every call.

use serde::{Deserialize, Serialize};

/// A point on the caller's monotonic millisecond clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Millis(pub u32);

impl Millis {
    /// The zero timestamp.
    pub const ZERO: Self = Self(0);

    /// Fold a 64-bit host uptime into the 32-bit device clock domain.
    pub fn from_u64_wrapping(ms: u64) -> Self {
        let low = ms & u64::from(u32::MAX);
        Self(u32::try_from(low).unwrap_or(0))
    }

    /// Milliseconds elapsed from `earlier` to `self`, wraparound-safe.
    pub const fn since(self, earlier: Self) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// The timestamp `ms` milliseconds after `self`, wrapping.
    pub const fn offset(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }

    /// Raw counter value.
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// A periodic timer that remembers when it last fired.
///
/// Firing resets the timer to the firing time, not to `last + interval`,
/// so a stalled caller never triggers a burst of catch-up firings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timer {
    last: Millis,
}

impl Timer {
    /// A timer whose last firing is `now`.
    pub const fn started(now: Millis) -> Self {
        Self { last: now }
    }

    /// When the timer last fired (or was restarted).
    pub const fn last(self) -> Millis {
        self.last
    }

    /// Milliseconds since the timer last fired.
    pub const fn elapsed(self, now: Millis) -> u32 {
        now.since(self.last)
    }

    /// Restart the timer at `now` without firing.
    pub const fn restart(&mut self, now: Millis) {
        self.last = now;
    }

    /// Fire if at least `interval_ms` elapsed. Returns whether it fired.
    pub const fn fire(&mut self, now: Millis, interval_ms: u32) -> bool {
        if self.elapsed(now) >= interval_ms {
            self.last = now;
            true
        } else {
            false
        }
    }
}
