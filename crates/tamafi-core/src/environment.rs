//! The scanner collaborator.
//!
//! The engine never scans by itself. It emits [`Event::WifiRequest`] and
//! the caller forwards that to an [`EnvironmentSource`], polls it on later
//! ticks, and hands any finished snapshot to
//! [`PetState::inject_environment`].
//!
//! [`Event::WifiRequest`]: tamafi_types::Event::WifiRequest
//! [`PetState::inject_environment`]: crate::state::PetState::inject_environment

use tamafi_types::EnvironmentSnapshot;

use crate::clock::Millis;

/// A source of environment scans.
///
/// Scans are asynchronous from the engine's point of view: a request is
/// started with [`request_scan`](Self::request_scan) and its result shows
/// up on some later [`poll`](Self::poll).
pub trait EnvironmentSource {
    /// Begin a scan. A request made while one is already running is
    /// absorbed by it.
    fn request_scan(&mut self, now: Millis);

    /// Return the finished snapshot, once. `None` while nothing is ready.
    fn poll(&mut self, now: Millis) -> Option<EnvironmentSnapshot>;
}

/// A source that answers every request with the same snapshot on the next
/// poll.
#[derive(Debug, Clone, Default)]
pub struct FixedEnvironmentSource {
    snapshot: EnvironmentSnapshot,
    pending: bool,
    requests: u64,
}

impl FixedEnvironmentSource {
    /// A source that always reports `snapshot`.
    pub const fn new(snapshot: EnvironmentSnapshot) -> Self {
        Self {
            snapshot,
            pending: false,
            requests: 0,
        }
    }

    /// Replace the snapshot future scans report.
    pub const fn set_snapshot(&mut self, snapshot: EnvironmentSnapshot) {
        self.snapshot = snapshot;
    }

    /// Number of scans requested so far.
    pub const fn requests(&self) -> u64 {
        self.requests
    }
}

impl EnvironmentSource for FixedEnvironmentSource {
    fn request_scan(&mut self, _now: Millis) {
        self.pending = true;
        self.requests = self.requests.saturating_add(1);
    }

    fn poll(&mut self, _now: Millis) -> Option<EnvironmentSnapshot> {
        if self.pending {
            self.pending = false;
            Some(self.snapshot)
        } else {
            None
        }
    }
}
