//! Architectural Constants.
//!
//! This module defines the fixed layout of the AVR data space. It includes:
//! 1. **Data Space Layout:** Register file, I/O region, and the start of SRAM.
//! 2. **Index Registers:** Base addresses of the X, Y, and Z register pairs.
//! 3. **Status Register:** SREG location and flag bit positions.
//! 4. **Program Memory:** Size limits implied by the address width.
//! 5. **Run Loop:** Default pacing and telemetry intervals.

/// Number of general purpose registers mapped at the bottom of data space.
pub const REGISTER_FILE_SIZE: usize = 32;

/// Data-space address where the I/O region begins (`in`/`out` address 0).
pub const IO_BASE: u16 = 0x20;

/// Offset of the data section (SRAM) in data memory.
///
/// Everything below it is the register file and I/O space. This is a property
/// of the architecture, not of a particular chip.
pub const DATA_SECTION_OFFSET: usize = 0x100;

/// Low byte address of the X index register (r26:r27).
pub const X_REGISTER: u16 = 0x1A;

/// Low byte address of the Y index register (r28:r29).
pub const Y_REGISTER: u16 = 0x1C;

/// Low byte address of the Z index register (r30:r31).
pub const Z_REGISTER: u16 = 0x1E;

/// Data-space address of the status register (I/O 0x3F).
pub const SREG_ADDR: u16 = 0x5F;

/// Carry flag bit.
pub const SREG_C: u8 = 1 << 0;
/// Zero flag bit.
pub const SREG_Z: u8 = 1 << 1;
/// Negative flag bit.
pub const SREG_N: u8 = 1 << 2;
/// Two's complement overflow flag bit.
pub const SREG_V: u8 = 1 << 3;
/// Sign flag bit (`N ^ V`).
pub const SREG_S: u8 = 1 << 4;
/// Half carry flag bit.
pub const SREG_H: u8 = 1 << 5;
/// Bit copy storage.
pub const SREG_T: u8 = 1 << 6;
/// Global interrupt enable.
pub const SREG_I: u8 = 1 << 7;

/// Largest program memory a 22-bit word address reaches, in bytes.
pub const MAX_PROGRAM_MEMORY: u32 = 1 << 23;

/// Largest program memory a two-byte return address reaches, in bytes.
pub const MAX_NARROW_PROGRAM_MEMORY: u32 = 1 << 17;

/// Size in bytes of a single instruction word.
pub const WORD_SIZE: u32 = 2;

/// Default pause between two executed instructions, in microseconds.
pub const DEFAULT_STEP_DELAY_US: u64 = 1;

/// Default telemetry sampling interval, in milliseconds.
pub const DEFAULT_TELEMETRY_INTERVAL_MS: u64 = 5000;
