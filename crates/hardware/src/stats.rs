//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters shared between the execution thread and
//! its observers. It provides:
//! 1. **Throughput:** Executed instructions and accumulated cycle cost.
//! 2. **Coverage:** Hits on instructions that decode but have no handler.
//! 3. **Probe:** The most recent value of the configured telemetry word.
//!
//! The execution thread is the only writer. Readers (the telemetry thread,
//! the host) take relaxed snapshots; counters are monotonic, so a slightly
//! stale read is harmless.
//!
//! Elapsed time counts from [`SimStats::restart_clock`], which the simulator
//! calls when the run starts, so load and listing time stay out of the rates.

use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Live counters of one simulation run.
#[derive(Debug)]
pub struct SimStats {
    created: Instant,
    /// Offset from `created` at which the clock was last restarted.
    clock_offset_ns: AtomicU64,
    instructions: AtomicU64,
    cycles: AtomicU64,
    unimplemented: AtomicU64,
    probe: AtomicU16,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            created: Instant::now(),
            clock_offset_ns: AtomicU64::new(0),
            instructions: AtomicU64::new(0),
            cycles: AtomicU64::new(0),
            unimplemented: AtomicU64::new(0),
            probe: AtomicU16::new(0),
        }
    }
}

impl SimStats {
    /// Creates zeroed counters; the wall clock starts now.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restarts the wall clock used for elapsed time and rates.
    pub fn restart_clock(&self) {
        let now = u64::try_from(self.created.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.clock_offset_ns.store(now, Ordering::Relaxed);
    }

    /// Wall-clock time since the last restart (or since creation).
    pub fn elapsed(&self) -> Duration {
        let offset = Duration::from_nanos(self.clock_offset_ns.load(Ordering::Relaxed));
        self.created.elapsed().saturating_sub(offset)
    }

    /// Records one executed instruction and its cycle cost.
    #[inline]
    pub fn record_step(&self, cycles: u8) {
        let _ = self.instructions.fetch_add(1, Ordering::Relaxed);
        let _ = self.cycles.fetch_add(u64::from(cycles), Ordering::Relaxed);
    }

    /// Records a hit on an instruction without a handler.
    #[inline]
    pub fn record_unimplemented(&self) {
        let _ = self.unimplemented.fetch_add(1, Ordering::Relaxed);
    }

    /// Publishes the current probe word.
    #[inline]
    pub fn publish_probe(&self, word: u16) {
        self.probe.store(word, Ordering::Relaxed);
    }

    /// Instructions executed so far.
    pub fn instructions(&self) -> u64 {
        self.instructions.load(Ordering::Relaxed)
    }

    /// Cycle cost accumulated so far.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Hits on unimplemented instructions so far.
    pub fn unimplemented(&self) -> u64 {
        self.unimplemented.load(Ordering::Relaxed)
    }

    /// Last published probe word.
    pub fn probe(&self) -> u16 {
        self.probe.load(Ordering::Relaxed)
    }

    /// Copies every counter at once.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            elapsed: self.elapsed(),
            instructions: self.instructions(),
            cycles: self.cycles(),
            unimplemented: self.unimplemented(),
            probe: self.probe(),
        }
    }
}

/// Point-in-time copy of [`SimStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Wall-clock time since the clock was last restarted.
    pub elapsed: Duration,
    /// Instructions executed.
    pub instructions: u64,
    /// Accumulated cycle cost.
    pub cycles: u64,
    /// Hits on unimplemented instructions.
    pub unimplemented: u64,
    /// Last probe word.
    pub probe: u16,
}

impl StatsSnapshot {
    /// Prints a summary block to stdout.
    pub fn print(&self) {
        let seconds = self.elapsed.as_secs_f64().max(f64::EPSILON);
        let instr = self.instructions.max(1);
        let khz = (self.cycles as f64 / seconds) / 1000.0;
        let kips = (self.instructions as f64 / seconds) / 1000.0;
        let cpi = self.cycles as f64 / instr as f64;

        println!("\n==========================================================");
        println!("AVR SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_insts                {}", self.instructions);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {khz:.2} kHz");
        println!("sim_kips                 {kips:.2}");
        println!("sim_cpi                  {cpi:.4}");
        println!("----------------------------------------------------------");
        println!(
            "  unimplemented          {} ({:.2}%)",
            self.unimplemented,
            (self.unimplemented as f64 / instr as f64) * 100.0
        );
        println!("  probe                  {:#06x}", self.probe);
        println!("==========================================================");
    }
}
