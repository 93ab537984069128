//! Radio environment data consumed by the engine.
//!
//! An external scanner produces one [`NetworkReading`] per visible access
//! point. [`EnvironmentSnapshot::from_readings`] folds them into the
//! pre-aggregated summary the engine feeds on. The engine trusts snapshots
//! as-is; [`EnvironmentSnapshot::is_plausible`] exists so a host can flag
//! a misbehaving scanner without the engine rejecting anything.

use serde::{Deserialize, Serialize};

/// Readings above this RSSI (dBm) count as strong signals.
pub const STRONG_SIGNAL_DBM: i32 = -60;

/// Average signal reported when nothing was heard.
pub const NO_SIGNAL_DBM: i32 = -100;

/// Authentication mode of a scanned network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthMode {
    /// No authentication required.
    Open,
    /// Any WEP/WPA/WPA2/WPA3 variant.
    Secured,
}

/// One access point seen during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkReading {
    /// Broadcast SSID. Empty for hidden networks.
    pub ssid: String,
    /// Received signal strength in dBm (negative; closer to zero is stronger).
    pub rssi: i32,
    /// Authentication mode.
    pub auth: AuthMode,
}

impl NetworkReading {
    /// Whether the network hides its SSID.
    pub const fn is_hidden(&self) -> bool {
        self.ssid.is_empty()
    }
}

/// Aggregated summary of one completed scan.
///
/// Counts are signed because the scanner collaborator is trusted verbatim;
/// the engine's reward formulas run on whatever values arrive here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    /// Number of networks seen.
    pub network_count: i32,
    /// Networks with RSSI above [`STRONG_SIGNAL_DBM`].
    pub strong_count: i32,
    /// Networks with an empty SSID.
    pub hidden_count: i32,
    /// Networks without authentication.
    pub open_count: i32,
    /// Networks with authentication.
    pub secured_count: i32,
    /// Mean RSSI in dBm, or [`NO_SIGNAL_DBM`] when nothing was seen.
    pub avg_signal: i32,
}

impl Default for EnvironmentSnapshot {
    fn default() -> Self {
        Self {
            network_count: 0,
            strong_count: 0,
            hidden_count: 0,
            open_count: 0,
            secured_count: 0,
            avg_signal: NO_SIGNAL_DBM,
        }
    }
}

impl EnvironmentSnapshot {
    /// Aggregate raw scan readings into a snapshot.
    ///
    /// The average signal uses truncating integer division.
    pub fn from_readings(readings: &[NetworkReading]) -> Self {
        let mut snapshot = Self::default();
        let mut total_rssi: i32 = 0;

        for reading in readings {
            snapshot.network_count = snapshot.network_count.saturating_add(1);
            total_rssi = total_rssi.saturating_add(reading.rssi);

            if reading.rssi > STRONG_SIGNAL_DBM {
                snapshot.strong_count = snapshot.strong_count.saturating_add(1);
            }
            if reading.is_hidden() {
                snapshot.hidden_count = snapshot.hidden_count.saturating_add(1);
            }
            match reading.auth {
                AuthMode::Open => snapshot.open_count = snapshot.open_count.saturating_add(1),
                AuthMode::Secured => {
                    snapshot.secured_count = snapshot.secured_count.saturating_add(1);
                }
            }
        }

        snapshot.avg_signal = total_rssi
            .checked_div(snapshot.network_count)
            .unwrap_or(NO_SIGNAL_DBM);
        snapshot
    }

    /// Whether no network was seen.
    pub const fn is_empty(&self) -> bool {
        self.network_count == 0
    }

    /// Whether the counts are internally consistent.
    ///
    /// Every count must be non-negative, each sub-count must not exceed the
    /// total, and open plus secured must equal the total.
    pub const fn is_plausible(&self) -> bool {
        let n = self.network_count;
        n >= 0
            && self.strong_count >= 0
            && self.hidden_count >= 0
            && self.open_count >= 0
            && self.secured_count >= 0
            && self.strong_count <= n
            && self.hidden_count <= n
            && self.open_count.saturating_add(self.secured_count) == n
            && self.avg_signal <= 0
    }
}
