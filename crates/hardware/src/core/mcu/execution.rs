//! Main Execution Loop.
//!
//! This module implements the execution cycle of the core. It performs the following:
//! 1. **Fetch:** Looks the program counter up in the instruction table; a miss
//!    is fatal.
//! 2. **Advance:** Moves the program counter past the instruction *before*
//!    dispatch, so relative branches and return addresses see the next
//!    instruction.
//! 3. **Dispatch:** Runs the bound handler, or records an unimplemented hit.
//! 4. **Accounting:** Updates the shared counters and the probe word.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{error, warn};

use super::Mcu;
use crate::common::SimError;

impl Mcu {
    /// Executes one instruction.
    ///
    /// # Returns
    ///
    /// The handler's cycle cost; 0 for instructions without a handler.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::CorruptControlFlow`] when no instruction starts at
    /// the program counter. The program counter is left unchanged.
    pub fn step(&mut self) -> Result<u8, SimError> {
        let pc = self.pc;
        let Some(inst) = self.instructions.get(pc).copied() else {
            return Err(SimError::CorruptControlFlow { pc });
        };

        self.pc = pc.wrapping_add(inst.byte_len());

        let cost = if let Some(handler) = inst.handler {
            handler(self, inst.operand1, inst.operand2)
        } else {
            if self.unimplemented_seen.insert(pc) {
                warn!(
                    pc = format_args!("{pc:#06x}"),
                    mnemonic = inst.prototype.mnemonic.name(),
                    "no handler, instruction skipped"
                );
            }
            self.stats.record_unimplemented();
            0
        };

        self.stats.record_step(cost);
        self.stats.publish_probe(self.probe_word());
        Ok(cost)
    }

    /// Steps until `stop` is raised or an instruction fails.
    ///
    /// # Arguments
    ///
    /// * `stop` - Cooperative cancellation flag, checked once per instruction.
    /// * `step_delay` - Pause after every instruction; zero runs free.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error raised by [`step`](Self::step).
    pub fn run(&mut self, stop: &AtomicBool, step_delay: Duration) -> Result<(), SimError> {
        while !stop.load(Ordering::Relaxed) {
            if let Err(e) = self.step() {
                error!(error = %e, "run loop terminated");
                return Err(e);
            }
            if !step_delay.is_zero() {
                thread::sleep(step_delay);
            }
        }
        Ok(())
    }
}
