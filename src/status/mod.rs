//! # Status Reporter
//!
//! Point-in-time snapshot of host resources, served unauthenticated at
//! `/api/status`. Nothing here is persisted; every request computes a
//! fresh snapshot.
//!
//! CPU usage is a delta between two refreshes, so the reporter keeps one
//! `System` alive and each snapshot reports usage since the previous one
//! (or since startup). Snapshots read `/proc` and take a lock; call them
//! from a blocking context.

mod format;

pub use format::{bytes_to_size, format_probe, format_uptime};

use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use sysinfo::System;

/// One logical CPU
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuInfo {
    pub name: String,
    pub model: String,
    /// MHz
    pub speed: u64,
    /// Percent busy since the previous snapshot
    pub usage: f32,
}

/// Response body of `/api/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub success: bool,
    pub hostname: String,
    pub system_speed: String,
    pub free_memory: String,
    pub total_memory: String,
    pub runtime: String,
    pub platform: String,
    pub cpu_count: usize,
    pub cpus: Vec<CpuInfo>,
}

/// Collects host metrics. Clones share one `System`.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    started: Instant,
    sys: Arc<Mutex<System>>,
}

impl StatusReporter {
    /// Start measuring uptime from now
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    /// Measure uptime from a given start instant
    pub fn started_at(started: Instant) -> Self {
        let mut sys = System::new();
        // Baseline sample for the first usage delta
        sys.refresh_cpu();

        Self {
            started,
            sys: Arc::new(Mutex::new(sys)),
        }
    }

    /// Take a fresh snapshot
    pub fn snapshot(&self) -> StatusSnapshot {
        // A panic mid-refresh leaves the counters usable; keep going.
        let mut sys = self.sys.lock().unwrap_or_else(|e| e.into_inner());
        sys.refresh_memory();
        sys.refresh_cpu();

        let cpus: Vec<CpuInfo> = sys
            .cpus()
            .iter()
            .map(|cpu| CpuInfo {
                name: cpu.name().to_string(),
                model: cpu.brand().trim().to_string(),
                speed: cpu.frequency(),
                usage: cpu.cpu_usage(),
            })
            .collect();

        let elapsed = self.started.elapsed();

        StatusSnapshot {
            success: true,
            hostname: System::host_name().unwrap_or_default(),
            system_speed: format_probe(elapsed.as_secs_f64() * 1000.0),
            free_memory: bytes_to_size(sys.available_memory()),
            total_memory: bytes_to_size(sys.total_memory()),
            runtime: format_uptime(elapsed.as_secs()),
            platform: std::env::consts::OS.to_string(),
            cpu_count: cpus.len(),
            cpus,
        }
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_shape() {
        let snapshot = StatusReporter::new().snapshot();

        assert!(snapshot.success);
        assert_eq!(snapshot.platform, std::env::consts::OS);
        assert_eq!(snapshot.cpu_count, snapshot.cpus.len());
        assert!(snapshot.system_speed.ends_with(" ms"));
        assert_ne!(snapshot.total_memory, "0 Byte");
    }

    #[test]
    fn test_runtime_measured_from_start() {
        let snapshot = StatusReporter::new().snapshot();
        assert_eq!(snapshot.runtime, "00:00:00");
    }

    #[test]
    fn test_cpu_usage_measured_between_snapshots() {
        let reporter = StatusReporter::new();

        // Keep one core busy across the minimum sampling window.
        let deadline = Instant::now() + sysinfo::MINIMUM_CPU_UPDATE_INTERVAL * 2;
        let mut spins = 0u64;
        while Instant::now() < deadline {
            spins = std::hint::black_box(spins.wrapping_add(1));
        }

        let snapshot = reporter.snapshot();
        assert!(!snapshot.cpus.is_empty());
        assert!(
            snapshot.cpus.iter().any(|cpu| cpu.usage > 0.0),
            "usage stayed at zero: {:?}",
            snapshot.cpus.iter().map(|cpu| cpu.usage).collect::<Vec<_>>()
        );
        assert!(snapshot
            .cpus
            .iter()
            .all(|cpu| cpu.usage.is_finite() && cpu.usage <= 100.0 + f32::EPSILON));
    }

    #[test]
    fn test_clones_share_sampler() {
        let reporter = StatusReporter::new();
        let clone = reporter.clone();
        assert!(Arc::ptr_eq(&reporter.sys, &clone.sys));
        assert_eq!(clone.snapshot().cpu_count, reporter.snapshot().cpu_count);
    }

    #[test]
    fn test_snapshot_serializes_expected_keys() {
        let value = serde_json::to_value(StatusReporter::new().snapshot()).unwrap();
        for key in [
            "success",
            "hostname",
            "system_speed",
            "free_memory",
            "total_memory",
            "runtime",
            "platform",
            "cpus",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }
}
