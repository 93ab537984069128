//! Synthetic radio scanner.
//!
//! Stands in for the device's Wi-Fi scan: each request completes after a
//! random latency and reports a random set of access points, aggregated
//! with [`EnvironmentSnapshot::from_readings`].

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use tamafi_core::{EnvironmentSource, HostConfig, Millis};
use tamafi_types::{AuthMode, EnvironmentSnapshot, NetworkReading};
use tracing::{debug, warn};

/// Chance that a generated network hides its SSID.
const HIDDEN_PROBABILITY: f64 = 0.1;

/// Chance that a generated network is open.
const OPEN_PROBABILITY: f64 = 0.25;

/// Weakest generated RSSI in dBm.
const RSSI_FLOOR: i32 = -95;

/// Strongest generated RSSI in dBm.
const RSSI_CEILING: i32 = -35;

/// A scan in flight.
#[derive(Debug, Clone, Copy)]
struct PendingScan {
    requested_at: Millis,
    latency_ms: u32,
}

/// Scanner that fabricates plausible environments.
#[derive(Debug, Clone)]
pub struct SyntheticScanner<R = SmallRng> {
    rng: R,
    latency_min_ms: u32,
    latency_max_ms: u32,
    max_networks: u32,
    pending: Option<PendingScan>,
}

impl SyntheticScanner<SmallRng> {
    /// Build from host settings. A seed makes the scans reproducible.
    pub fn from_config(config: &HostConfig, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        Self::with_rng(config, rng)
    }
}

impl<R: RngCore> SyntheticScanner<R> {
    /// Build from host settings with the given random source.
    pub const fn with_rng(config: &HostConfig, rng: R) -> Self {
        Self {
            rng,
            latency_min_ms: config.scan_latency_min_ms,
            latency_max_ms: config.scan_latency_max_ms,
            max_networks: config.scan_max_networks,
            pending: None,
        }
    }

    fn generate(&mut self) -> Vec<NetworkReading> {
        let count = self.rng.random_range(0..=self.max_networks);
        (0..count)
            .map(|_| {
                let ssid = if self.rng.random_bool(HIDDEN_PROBABILITY) {
                    String::new()
                } else {
                    format!("net-{:04x}", self.rng.random::<u16>())
                };
                let auth = if self.rng.random_bool(OPEN_PROBABILITY) {
                    AuthMode::Open
                } else {
                    AuthMode::Secured
                };
                NetworkReading {
                    ssid,
                    rssi: self.rng.random_range(RSSI_FLOOR..=RSSI_CEILING),
                    auth,
                }
            })
            .collect()
    }
}

impl<R: RngCore> EnvironmentSource for SyntheticScanner<R> {
    fn request_scan(&mut self, now: Millis) {
        if self.pending.is_some() {
            return;
        }
        let latency_ms = self
            .rng
            .random_range(self.latency_min_ms..self.latency_max_ms);
        debug!(latency_ms, "Scan started");
        self.pending = Some(PendingScan {
            requested_at: now,
            latency_ms,
        });
    }

    fn poll(&mut self, now: Millis) -> Option<EnvironmentSnapshot> {
        let scan = self.pending?;
        if now.since(scan.requested_at) < scan.latency_ms {
            return None;
        }
        self.pending = None;

        let readings = self.generate();
        let snapshot = EnvironmentSnapshot::from_readings(&readings);
        if !snapshot.is_plausible() {
            warn!(?snapshot, "Scanner produced an implausible snapshot");
        }
        debug!(
            networks = snapshot.network_count,
            strong = snapshot.strong_count,
            hidden = snapshot.hidden_count,
            open = snapshot.open_count,
            avg_signal = snapshot.avg_signal,
            "Scan finished"
        );
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner(seed: u64) -> SyntheticScanner {
        SyntheticScanner::from_config(&HostConfig::default(), Some(seed))
    }

    #[test]
    fn nothing_until_requested() {
        let mut scanner = scanner(1);
        assert_eq!(scanner.poll(Millis(10_000)), None);
    }

    #[test]
    fn result_arrives_after_latency() {
        let mut scanner = scanner(2);
        scanner.request_scan(Millis(1_000));

        // Default latency is at least 1.5 s.
        assert_eq!(scanner.poll(Millis(2_499)), None);

        let snapshot = scanner.poll(Millis(4_500));
        assert!(snapshot.is_some());
        assert_eq!(scanner.poll(Millis(5_000)), None);
    }

    #[test]
    fn snapshots_are_plausible_and_bounded() {
        let mut scanner = scanner(3);
        let mut now = Millis::ZERO;
        for _ in 0..200 {
            scanner.request_scan(now);
            now = now.offset(4_000);
            let snapshot = scanner.poll(now).unwrap_or_default();
            assert!(snapshot.is_plausible());
            assert!(snapshot.network_count <= 16);
            if snapshot.network_count > 0 {
                assert!((RSSI_FLOOR..=RSSI_CEILING).contains(&snapshot.avg_signal));
            }
        }
    }

    #[test]
    fn repeated_request_joins_running_scan() {
        let mut scanner = scanner(4);
        scanner.request_scan(Millis(0));
        scanner.request_scan(Millis(1_400));
        assert!(scanner.poll(Millis(3_500)).is_some());
    }
}
