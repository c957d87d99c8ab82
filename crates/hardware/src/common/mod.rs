//! Common types and constants shared across the simulator.
//!
//! This module provides the building blocks every other component leans on:
//! 1. **Constants:** Data-space layout, index register addresses, and status register bits.
//! 2. **Error Handling:** Fatal simulator errors, configuration errors, and non-fatal decode issues.
//! 3. **Register Views:** 16-bit windows over two adjacent bytes of data memory.

/// Architectural constants (data-space layout, SREG bits, index registers).
pub mod constants;

/// Error types and decode diagnostics.
pub mod error;

/// 16-bit register-pair views over data memory.
pub mod reg;

pub use error::{ConfigError, DecodeIssue, SimError};
pub use reg::{RegPair, WordMut};
