//! Periodic Telemetry.
//!
//! A low-priority observer thread that wakes on a fixed interval, reads the
//! shared [`SimStats`] counters, and reports the throughput since its previous
//! wake-up together with the probe word. It never touches simulator memory;
//! the execution thread publishes everything it needs.
//!
//! Samples are logged at info level and sent to the host over an unbounded
//! channel. A host that dropped its receiver simply stops getting them.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel as cbc;
use tracing::{debug, info};

use crate::stats::{SimStats, StatsSnapshot};

/// Throughput over one telemetry interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Wall-clock time since the run started.
    pub elapsed: Duration,
    /// Instructions executed during the interval.
    pub instructions: u64,
    /// Cycle cost accumulated during the interval.
    pub cycles: u64,
    /// Instructions per second over the interval.
    pub instructions_per_sec: f64,
    /// Unimplemented hits during the interval.
    pub unimplemented: u64,
    /// Probe word at the end of the interval.
    pub probe: u16,
}

impl Sample {
    /// Difference between two snapshots. The rate uses the wall-clock time
    /// that actually passed between them, not the nominal tick interval.
    pub const fn between(prev: &StatsSnapshot, now: &StatsSnapshot) -> Self {
        let instructions = now.instructions.saturating_sub(prev.instructions);
        let secs = now.elapsed.saturating_sub(prev.elapsed).as_secs_f64();
        Self {
            elapsed: now.elapsed,
            instructions,
            cycles: now.cycles.saturating_sub(prev.cycles),
            instructions_per_sec: if secs > 0.0 { instructions as f64 / secs } else { 0.0 },
            unimplemented: now.unimplemented.saturating_sub(prev.unimplemented),
            probe: now.probe,
        }
    }
}

/// Handle to a running telemetry thread.
#[derive(Debug)]
pub struct Telemetry {
    stop_tx: cbc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Telemetry {
    /// Spawns the observer.
    ///
    /// # Arguments
    ///
    /// * `stats` - Counters published by the execution thread.
    /// * `interval` - Sampling period.
    /// * `samples` - Where each [`Sample`] is sent.
    pub fn spawn(stats: Arc<SimStats>, interval: Duration, samples: cbc::Sender<Sample>) -> Self {
        let (stop_tx, stop_rx) = cbc::bounded::<()>(1);
        let handle = thread::spawn(move || observe(&stats, interval, &samples, &stop_rx));
        Self { stop_tx, handle }
    }

    /// Stops the observer and waits for it to exit.
    pub fn shutdown(self) {
        drop(self.stop_tx);
        if self.handle.join().is_err() {
            debug!("telemetry thread panicked");
        }
    }
}

fn observe(stats: &SimStats, interval: Duration, samples: &cbc::Sender<Sample>, stop: &cbc::Receiver<()>) {
    let ticker = cbc::tick(interval);
    let mut prev = stats.snapshot();

    loop {
        cbc::select! {
            recv(ticker) -> _ => {
                let now = stats.snapshot();
                let sample = Sample::between(&prev, &now);
                info!(
                    instructions = sample.instructions,
                    cycles = sample.cycles,
                    ips = format_args!("{:.0}", sample.instructions_per_sec),
                    probe = format_args!("{:#06x}", sample.probe),
                    "telemetry"
                );
                let _ = samples.send(sample);
                prev = now;
            }
            recv(stop) -> _ => break,
        }
    }
}
