//! # Simulator Lifecycle Tests
//!
//! Ready -> Running -> Stopped, with the core handed back on stop, fatal
//! errors surfaced to the host, and telemetry delivered over the channel.

use std::thread;
use std::time::{Duration, Instant};

use avrsim_core::common::SimError;
use avrsim_core::config::{Probe, SimConfig, TelemetryConfig};
use avrsim_core::sim::{SimState, Simulator};
use avrsim_core::{FirmwareImage, device};

use crate::common::builder::ProgramBuilder;
use crate::common::harness::init_tracing;

fn quiet_config() -> SimConfig {
    SimConfig {
        step_delay_us: 0,
        listing: false,
        telemetry: TelemetryConfig {
            enabled: false,
            ..TelemetryConfig::default()
        },
    }
}

fn simulator(image: &FirmwareImage, config: SimConfig) -> Simulator {
    init_tracing();
    let device = device::lookup(device::DEFAULT_DEVICE).expect("device");
    Simulator::new(&device, image, config).expect("simulator")
}

/// Waits until the execution thread exits on its own.
fn wait_finished(sim: &Simulator) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !sim.is_finished() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }
    assert!(sim.is_finished(), "run loop did not exit");
}

#[test]
fn test_start_stop_returns_core() {
    let image = ProgramBuilder::new().ldi(16, 0x2A).halt().image();
    let mut sim = simulator(&image, quiet_config());
    assert_eq!(sim.state(), SimState::Ready);
    assert!(sim.mcu().is_some());

    sim.start().expect("start");
    assert_eq!(sim.state(), SimState::Running);
    assert!(sim.mcu().is_none());
    thread::sleep(Duration::from_millis(20));

    let report = sim.stop().expect("stop");
    assert_eq!(sim.state(), SimState::Stopped);
    assert_eq!(report.pc, 2);
    assert!(report.stats.instructions >= 2);
    assert_eq!(report.stats.unimplemented, 0);

    let mcu = sim.mcu().expect("core is back");
    assert_eq!(mcu.data()[16], 0x2A);
    assert_eq!(sim.stats().instructions(), report.stats.instructions);
}

#[test]
fn test_lifecycle_is_one_way() {
    let mut sim = simulator(&ProgramBuilder::new().halt().image(), quiet_config());

    let err = sim.stop().unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidState { expected: SimState::Running, actual: SimState::Ready }
    ));

    sim.start().expect("start");
    let err = sim.start().unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidState { expected: SimState::Ready, actual: SimState::Running }
    ));

    let _ = sim.stop().expect("stop");
    let err = sim.start().unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidState { expected: SimState::Ready, actual: SimState::Stopped }
    ));
    assert!(sim.stop().is_err());
}

#[test]
fn test_fatal_error_ends_run() {
    let mut sim = simulator(&ProgramBuilder::new().nop().image(), quiet_config());
    sim.start().expect("start");
    wait_finished(&sim);

    let err = sim.stop().unwrap_err();
    assert!(matches!(err, SimError::CorruptControlFlow { pc: 2 }));
    assert_eq!(sim.state(), SimState::Stopped);
    assert_eq!(sim.mcu().map(|m| m.pc()), Some(2));
    assert_eq!(sim.stats().instructions(), 1);
}

#[test]
fn test_run_for_returns_early_on_fatal_error() {
    let mut sim = simulator(&ProgramBuilder::new().nop().nop().image(), quiet_config());
    let started = Instant::now();

    let result = sim.run_for(Duration::from_secs(30));
    assert!(matches!(result, Err(SimError::CorruptControlFlow { pc: 4 })));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_run_for_stops_a_healthy_program() {
    let mut sim = simulator(&ProgramBuilder::new().halt().image(), quiet_config());
    let report = sim.run_for(Duration::from_millis(30)).expect("run");
    assert_eq!(report.pc, 0);
    assert!(report.stats.cycles >= 2);
}

#[test]
fn test_elapsed_counts_from_start() {
    let mut sim = simulator(&ProgramBuilder::new().halt().image(), quiet_config());
    thread::sleep(Duration::from_millis(300));
    let report = sim.run_for(Duration::from_millis(20)).expect("run");
    assert!(report.stats.elapsed >= Duration::from_millis(20));
    assert!(report.stats.elapsed < Duration::from_millis(300), "{:?}", report.stats.elapsed);
}

#[test]
fn test_telemetry_reports_probe() {
    let image = ProgramBuilder::new().halt().bytes(&[0x34, 0x12]).image();
    let config = SimConfig {
        step_delay_us: 10,
        listing: true,
        telemetry: TelemetryConfig {
            enabled: true,
            interval_ms: 20,
            probe: Probe::Address(0x0102),
        },
    };
    let mut sim = simulator(&image, config);
    sim.start().expect("start");

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut seen = None;
    while Instant::now() < deadline {
        if let Ok(sample) = sim.samples().recv_timeout(Duration::from_millis(500)) {
            if sample.probe == 0x1234 {
                seen = Some(sample);
                break;
            }
        }
    }
    let _ = sim.stop().expect("stop");

    let sample = seen.expect("a telemetry sample with the probe word");
    assert_eq!(sample.unimplemented, 0);
    assert!(sample.instructions_per_sec >= 0.0);
}

#[test]
fn test_disabled_telemetry_sends_nothing() {
    let mut sim = simulator(&ProgramBuilder::new().halt().image(), quiet_config());
    sim.start().expect("start");
    assert!(sim.samples().recv_timeout(Duration::from_millis(50)).is_err());
    let _ = sim.stop().expect("stop");
}

#[test]
fn test_listing_is_available_before_start() {
    let image = ProgramBuilder::new().ldi(16, 0x2A).halt().image();
    let sim = simulator(&image, quiet_config());
    assert_eq!(sim.listing().len(), 2);
    assert!(sim.listing()[1].starts_with("0x0002: rjmp"));
}

#[test]
fn test_drop_while_running_stops_threads() {
    let config = SimConfig {
        step_delay_us: 0,
        listing: false,
        telemetry: TelemetryConfig {
            enabled: true,
            interval_ms: 5,
            probe: Probe::YPointer,
        },
    };
    let mut sim = simulator(&ProgramBuilder::new().halt().image(), config);
    sim.start().expect("start");
    thread::sleep(Duration::from_millis(10));
    drop(sim);
}
