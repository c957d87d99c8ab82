//! Core processor implementation.
//!
//! This module contains the execution core: the `Mcu` that owns the memory
//! spaces, program counter and status register, and the instruction handlers
//! it dispatches to.

/// Instruction handlers and mnemonic-to-handler binding.
pub mod handlers;

/// Microcontroller state, memory access, and the run loop.
pub mod mcu;

pub use self::handlers::Handler;
pub use self::mcu::Mcu;
