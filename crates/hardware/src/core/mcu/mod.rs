//! Microcontroller Core Definition and Initialization.
//!
//! This module defines the `Mcu` structure, the container for the entire
//! processor state. It coordinates the following:
//! 1. **Memory Spaces:** Program memory, unified data memory, and EEPROM, sized
//!    once from the device prototype.
//! 2. **Decoded Program:** The immutable instruction table produced at load.
//! 3. **Architectural State:** Program counter (a byte address), status
//!    register, and stack pointer, the latter two living in data memory.
//! 4. **Statistics:** Counters shared with observers on other threads.

/// Fetch-advance-dispatch step and the run loop.
pub mod execution;

/// Guarded data memory access and the stack.
pub mod memory;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::common::constants::{DATA_SECTION_OFFSET, SREG_ADDR, SREG_N, SREG_S, SREG_V, SREG_Z};
use crate::common::{DecodeIssue, RegPair, SimError, WordMut};
use crate::config::{DevicePrototype, Probe};
use crate::isa::catalog::Catalog;
use crate::isa::disasm;
use crate::isa::instruction::InstructionTable;
use crate::sim::loader::{self, FirmwareImage, allocate};
use crate::stats::SimStats;

/// Main microcontroller structure containing all processor state.
#[derive(Debug)]
pub struct Mcu {
    device: DevicePrototype,
    pc: u32,
    instructions: InstructionTable,
    program_memory: Vec<u8>,
    data: Vec<u8>,
    eeprom: Vec<u8>,
    issues: Vec<DecodeIssue>,
    sp: RegPair,
    probe: Probe,
    stats: Arc<SimStats>,
    unimplemented_seen: HashSet<u32>,
}

impl Mcu {
    /// Creates a microcontroller running `image` decoded with the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the device prototype is invalid or a memory space
    /// cannot be allocated. Problems in the image itself are not errors; see
    /// [`issues`](Self::issues).
    pub fn new(device: &DevicePrototype, image: &FirmwareImage) -> Result<Self, SimError> {
        Self::with_catalog(Catalog::avr(), device, image)
    }

    /// Creates a microcontroller decoding `image` against a custom catalog.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Instruction patterns, searched in order.
    /// * `device` - Memory layout to allocate.
    /// * `image` - Firmware chunks keyed by load address.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_catalog(catalog: &Catalog, device: &DevicePrototype, image: &FirmwareImage) -> Result<Self, SimError> {
        let decoded = loader::decode_with(catalog, device, image)?;

        let mut data = allocate("data memory", device.data_memory_size(), 0u8)?;
        let eeprom = allocate("eeprom", device.eeprom_size as usize, 0xFFu8)?;
        data[DATA_SECTION_OFFSET..].copy_from_slice(&decoded.data_section);

        let sp = RegPair::at(device.stack_pointer_low_addr);
        sp.set(&mut data, device.data_memory_size() as u16);

        debug!(
            device = %device.name,
            flash = device.program_memory_size,
            data = data.len(),
            eeprom = eeprom.len(),
            "memory allocated"
        );

        Ok(Self {
            device: device.clone(),
            pc: 0,
            instructions: decoded.instructions,
            program_memory: decoded.program_memory,
            data,
            eeprom,
            issues: decoded.issues,
            sp,
            probe: Probe::default(),
            stats: Arc::new(SimStats::new()),
            unimplemented_seen: HashSet::new(),
        })
    }

    /// The device this core was built for.
    pub const fn device(&self) -> &DevicePrototype {
        &self.device
    }

    /// Program counter, as a byte address.
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Moves the program counter. `pc` is a byte address.
    pub const fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    /// Status register.
    pub fn sreg(&self) -> u8 {
        self.data[usize::from(SREG_ADDR)]
    }

    /// Overwrites the status register.
    pub fn set_sreg(&mut self, val: u8) {
        self.data[usize::from(SREG_ADDR)] = val;
    }

    /// Whether every bit of `mask` is set in SREG.
    pub fn flag(&self, mask: u8) -> bool {
        self.sreg() & mask == mask
    }

    /// Sets or clears the SREG bits in `mask`.
    pub fn set_flag(&mut self, mask: u8, on: bool) {
        let sreg = self.sreg();
        self.set_sreg(if on { sreg | mask } else { sreg & !mask });
    }

    /// Updates Z, N and S from an 8-bit result. V is read, never written.
    pub fn check_zns(&mut self, result: u8) {
        let n = result & 0x80 != 0;
        let v = self.flag(SREG_V);
        self.set_flag(SREG_Z, result == 0);
        self.set_flag(SREG_N, n);
        self.set_flag(SREG_S, n ^ v);
    }

    /// Stack pointer.
    pub const fn sp(&self) -> u16 {
        self.sp.get(self.data.as_slice())
    }

    /// Overwrites the stack pointer.
    pub const fn set_sp(&mut self, val: u16) {
        self.sp.set(self.data.as_mut_slice(), val);
    }

    /// Reads a register pair (X, Y, Z, or any pair at a fixed address).
    pub const fn pair(&self, pair: RegPair) -> u16 {
        pair.get(self.data.as_slice())
    }

    /// Borrows a register pair for in-place arithmetic.
    pub const fn pair_mut(&mut self, pair: RegPair) -> WordMut<'_> {
        pair.view(self.data.as_mut_slice())
    }

    /// Unified data memory (registers, I/O, SRAM).
    pub const fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Mutable unified data memory.
    pub const fn data_mut(&mut self) -> &mut [u8] {
        self.data.as_mut_slice()
    }

    /// Raw program memory, for display.
    pub const fn program_memory(&self) -> &[u8] {
        self.program_memory.as_slice()
    }

    /// EEPROM contents. Untouched by the implemented instructions.
    pub const fn eeprom(&self) -> &[u8] {
        self.eeprom.as_slice()
    }

    /// The decoded program.
    pub const fn instructions(&self) -> &InstructionTable {
        &self.instructions
    }

    /// Diagnostics collected while decoding.
    pub const fn issues(&self) -> &[DecodeIssue] {
        self.issues.as_slice()
    }

    /// Disassembly of the decoded program, one line per instruction.
    pub fn listing(&self) -> Vec<String> {
        disasm::listing(&self.instructions)
    }

    /// Shared counters.
    pub const fn stats(&self) -> &Arc<SimStats> {
        &self.stats
    }

    /// Selects the word published as the telemetry probe after every step.
    pub const fn set_probe(&mut self, probe: Probe) {
        self.probe = probe;
    }

    /// Current value of the probe word. Out-of-range bytes read as 0.
    pub fn probe_word(&self) -> u16 {
        let addr = match self.probe {
            Probe::YPointer => self.pair(RegPair::Y),
            Probe::Address(addr) => addr,
        };
        let byte = |a: u16| self.data.get(usize::from(a)).copied().unwrap_or(0);
        u16::from_le_bytes([byte(addr), byte(addr.wrapping_add(1))])
    }
}
