//! Simulator Error Definitions.
//!
//! This module defines the error handling surface of the simulator. It provides:
//! 1. **Fatal Errors:** `SimError`, which stops construction or the run loop.
//! 2. **Configuration Errors:** `ConfigError`, raised while selecting or validating a device.
//! 3. **Decode Diagnostics:** `DecodeIssue`, non-fatal events collected while loading an image.

use std::fmt;

use thiserror::Error;

use crate::sim::SimState;

/// Errors raised while looking up, parsing, or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No device in the built-in catalog matches the identifier.
    #[error("unknown device '{0}'")]
    UnknownDevice(String),

    /// The device prototype is internally inconsistent.
    #[error("invalid device '{name}': {reason}")]
    InvalidDevice {
        /// Device name as given in the prototype.
        name: String,
        /// What check failed.
        reason: String,
    },

    /// The JSON document could not be deserialized.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal simulator errors.
///
/// Construction errors are returned before the run loop exists; run-time
/// errors terminate the run loop and are handed back to the host on stop.
#[derive(Debug, Error)]
pub enum SimError {
    /// The program counter reached an address with no decoded instruction.
    ///
    /// Either control flow landed in the middle of a two-word instruction, or
    /// on bytes the decoder skipped or never saw.
    #[error("corrupt control flow: no instruction decoded at {pc:#06x}")]
    CorruptControlFlow {
        /// Byte address of the failed fetch.
        pc: u32,
    },

    /// A memory space sized from the device prototype could not be allocated.
    #[error("failed to allocate {size} bytes for {space}")]
    Allocation {
        /// Which memory space was being allocated.
        space: &'static str,
        /// Requested size in bytes.
        size: usize,
    },

    /// A lifecycle operation was attempted in the wrong state.
    #[error("simulator is {actual}, expected {expected}")]
    InvalidState {
        /// State the operation requires.
        expected: SimState,
        /// State the simulator was in.
        actual: SimState,
    },

    /// Device selection or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The execution thread panicked instead of returning.
    #[error("execution thread panicked")]
    ThreadPanicked,
}

/// Non-fatal events reported while decoding a firmware image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeIssue {
    /// No catalog entry matches the word; it was skipped.
    UnknownOpcode {
        /// Byte address of the word.
        addr: u32,
        /// The raw instruction word.
        word: u16,
    },

    /// A two-word instruction was cut off by the end of its chunk.
    Truncated {
        /// Byte address of the first word.
        addr: u32,
        /// The raw first word.
        word: u16,
    },

    /// Part of a chunk lies outside the memory it was destined for.
    OutOfRange {
        /// First dropped byte address.
        addr: u32,
        /// Number of dropped bytes.
        len: usize,
    },
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode { addr, word } => {
                write!(f, "unknown opcode {word:#06x} at {addr:#06x}")
            }
            Self::Truncated { addr, word } => {
                write!(f, "two-word instruction {word:#06x} truncated at {addr:#06x}")
            }
            Self::OutOfRange { addr, len } => {
                write!(f, "{len} bytes at {addr:#06x} fall outside memory")
            }
        }
    }
}
