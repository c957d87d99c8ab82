//! # Statistics Tests
//!
//! The shared counters, their wall clock, and the per-interval telemetry
//! sample derived from two snapshots.

use std::thread;
use std::time::Duration;

use avrsim_core::sim::Sample;
use avrsim_core::stats::{SimStats, StatsSnapshot};
use pretty_assertions::assert_eq;

fn snapshot(secs: u64, instructions: u64) -> StatsSnapshot {
    StatsSnapshot {
        elapsed: Duration::from_secs(secs),
        instructions,
        cycles: instructions * 2,
        ..StatsSnapshot::default()
    }
}

#[test]
fn test_counters_accumulate() {
    let stats = SimStats::new();
    stats.record_step(1);
    stats.record_step(3);
    stats.record_unimplemented();
    stats.publish_probe(0xBEEF);

    let snap = stats.snapshot();
    assert_eq!(snap.instructions, 2);
    assert_eq!(snap.cycles, 4);
    assert_eq!(snap.unimplemented, 1);
    assert_eq!(snap.probe, 0xBEEF);
}

#[test]
fn test_restart_clock_drops_idle_time() {
    let stats = SimStats::new();
    thread::sleep(Duration::from_millis(200));
    assert!(stats.elapsed() >= Duration::from_millis(200));

    stats.restart_clock();
    assert!(stats.snapshot().elapsed < Duration::from_millis(200));
}

#[test]
fn test_sample_rate_uses_measured_time() {
    // A late wake-up: three seconds passed since the previous snapshot.
    let sample = Sample::between(&snapshot(1, 1_000), &snapshot(4, 4_000));
    assert_eq!(sample.instructions, 3_000);
    assert_eq!(sample.cycles, 6_000);
    assert_eq!(sample.elapsed, Duration::from_secs(4));
    assert!((sample.instructions_per_sec - 1_000.0).abs() < 1e-9);
}

#[test]
fn test_sample_without_elapsed_time_has_zero_rate() {
    let sample = Sample::between(&snapshot(2, 10), &snapshot(2, 50));
    assert_eq!(sample.instructions, 40);
    assert!(sample.instructions_per_sec.abs() < f64::EPSILON);
}
