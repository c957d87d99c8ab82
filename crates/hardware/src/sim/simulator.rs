//! Simulator: owns the core and the threads that drive and observe it.
//!
//! The lifecycle is a one-way state machine:
//!
//! ```text
//! Ready --start()--> Running --stop()--> Stopped
//! ```
//!
//! While running, the [`Mcu`] lives on a dedicated execution thread and the
//! host only sees the shared counters and telemetry samples. `stop()` raises
//! the cooperative stop flag, joins the thread and hands the core back, so it
//! can be inspected afterwards. Dropping a running simulator stops it.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel as cbc;
use tracing::{debug, info, warn};

use super::loader::FirmwareImage;
use super::telemetry::{Sample, Telemetry};
use crate::common::SimError;
use crate::config::{DevicePrototype, SimConfig};
use crate::core::Mcu;
use crate::stats::{SimStats, StatsSnapshot};

/// How often [`Simulator::run_for`] checks for an early exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Lifecycle state of a [`Simulator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimState {
    /// Constructed, not yet started.
    Ready,
    /// The execution thread is live.
    Running,
    /// Stopped; the core is available for inspection.
    Stopped,
}

impl fmt::Display for SimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Summary of a completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Counters at the moment the run ended.
    pub stats: StatsSnapshot,
    /// Program counter at the moment the run ended.
    pub pc: u32,
}

type Worker = JoinHandle<(Mcu, Result<(), SimError>)>;

/// Top-level simulator: core, execution thread, and telemetry.
#[derive(Debug)]
pub struct Simulator {
    config: SimConfig,
    state: SimState,
    mcu: Option<Mcu>,
    stats: Arc<SimStats>,
    listing: Vec<String>,
    stop: Arc<AtomicBool>,
    worker: Option<Worker>,
    telemetry: Option<Telemetry>,
    samples_tx: cbc::Sender<Sample>,
    samples_rx: cbc::Receiver<Sample>,
}

impl Simulator {
    /// Builds the core for `device` and decodes `image` into it.
    ///
    /// # Errors
    ///
    /// Returns an error if the device prototype is invalid or memory cannot be
    /// allocated.
    pub fn new(device: &DevicePrototype, image: &FirmwareImage, config: SimConfig) -> Result<Self, SimError> {
        let mut mcu = Mcu::new(device, image)?;
        mcu.set_probe(config.telemetry.probe);

        let listing = mcu.listing();
        if config.listing {
            for line in &listing {
                debug!("{line}");
            }
        }
        for issue in mcu.issues() {
            debug!(%issue, "decode issue");
        }

        info!(
            device = %device.name,
            instructions = mcu.instructions().count(),
            issues = mcu.issues().len(),
            "simulator ready"
        );

        let stats = Arc::clone(mcu.stats());
        let (samples_tx, samples_rx) = cbc::unbounded();
        Ok(Self {
            config,
            state: SimState::Ready,
            mcu: Some(mcu),
            stats,
            listing,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
            telemetry: None,
            samples_tx,
            samples_rx,
        })
    }

    /// Spawns the execution thread (and the telemetry thread if enabled).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] unless the simulator is `Ready`.
    pub fn start(&mut self) -> Result<(), SimError> {
        let invalid = SimError::InvalidState {
            expected: SimState::Ready,
            actual: self.state,
        };
        if self.state != SimState::Ready {
            return Err(invalid);
        }
        let Some(mut mcu) = self.mcu.take() else {
            return Err(invalid);
        };

        self.stop.store(false, Ordering::Relaxed);
        self.stats.restart_clock();
        let stop = Arc::clone(&self.stop);
        let delay = Duration::from_micros(self.config.step_delay_us);
        self.worker = Some(thread::spawn(move || {
            let result = mcu.run(&stop, delay);
            (mcu, result)
        }));

        let telemetry = &self.config.telemetry;
        if telemetry.enabled && telemetry.interval_ms > 0 {
            self.telemetry = Some(Telemetry::spawn(
                Arc::clone(&self.stats),
                Duration::from_millis(telemetry.interval_ms),
                self.samples_tx.clone(),
            ));
        }

        self.state = SimState::Running;
        info!(step_delay_us = self.config.step_delay_us, "simulation started");
        Ok(())
    }

    /// Stops the run and takes the core back.
    ///
    /// # Returns
    ///
    /// A [`RunReport`] if the run loop was still healthy when stopped.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] unless the simulator is `Running`,
    /// the fatal error that ended the run loop early, or
    /// [`SimError::ThreadPanicked`].
    pub fn stop(&mut self) -> Result<RunReport, SimError> {
        let invalid = SimError::InvalidState {
            expected: SimState::Running,
            actual: self.state,
        };
        if self.state != SimState::Running {
            return Err(invalid);
        }
        let Some(worker) = self.worker.take() else {
            return Err(invalid);
        };

        self.stop.store(true, Ordering::Relaxed);
        let joined = worker.join();

        if let Some(telemetry) = self.telemetry.take() {
            telemetry.shutdown();
        }
        self.state = SimState::Stopped;

        let (mcu, result) = joined.map_err(|_| SimError::ThreadPanicked)?;
        let report = RunReport {
            stats: self.stats.snapshot(),
            pc: mcu.pc(),
        };
        self.mcu = Some(mcu);

        match result {
            Ok(()) => {
                info!(
                    instructions = report.stats.instructions,
                    cycles = report.stats.cycles,
                    pc = format_args!("{:#06x}", report.pc),
                    "simulation stopped"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "simulation ended with a fatal error");
                Err(e)
            }
        }
    }

    /// Runs for at most `duration` of wall-clock time, then stops.
    ///
    /// Returns early if the run loop exits on its own.
    ///
    /// # Errors
    ///
    /// Same as [`start`](Self::start) and [`stop`](Self::stop).
    pub fn run_for(&mut self, duration: Duration) -> Result<RunReport, SimError> {
        self.start()?;
        let deadline = Instant::now() + duration;
        while Instant::now() < deadline && !self.is_finished() {
            thread::sleep(POLL_INTERVAL.min(deadline.saturating_duration_since(Instant::now())));
        }
        self.stop()
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> SimState {
        self.state
    }

    /// Whether the execution thread has exited on its own (a fatal error).
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_some_and(JoinHandle::is_finished)
    }

    /// Telemetry samples, one per interval while running.
    pub const fn samples(&self) -> &cbc::Receiver<Sample> {
        &self.samples_rx
    }

    /// Disassembly of the loaded program.
    pub const fn listing(&self) -> &[String] {
        self.listing.as_slice()
    }

    /// Live counters, readable in any state.
    pub const fn stats(&self) -> &Arc<SimStats> {
        &self.stats
    }

    /// The core, unless it is on the execution thread.
    pub const fn mcu(&self) -> Option<&Mcu> {
        self.mcu.as_ref()
    }

    /// Mutable access to the core, unless it is on the execution thread.
    pub const fn mcu_mut(&mut self) -> Option<&mut Mcu> {
        self.mcu.as_mut()
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        if self.state == SimState::Running {
            let _ = self.stop();
        }
    }
}
