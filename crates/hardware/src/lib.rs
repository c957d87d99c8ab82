//! AVR microcontroller simulator library.
//!
//! This crate implements an instruction-level simulator for 8-bit AVR parts with the following:
//! 1. **ISA:** An ordered opcode/mask catalog of the classic instruction set, operand
//!    resolvers, and a disassembler.
//! 2. **Loader:** Decoding of a firmware image into a sparse instruction table plus
//!    initialized data.
//! 3. **Core:** Unified data memory with register-pair views, status flags, the stack,
//!    and the handlers for the executed subset.
//! 4. **Simulation:** A threaded run loop with cooperative stop, shared statistics,
//!    and periodic telemetry.
//! 5. **Configuration:** Device prototypes (built-in or JSON) and run settings.
//!
//! # Example
//!
//! ```
//! use avrsim_core::{FirmwareImage, Mcu, device};
//!
//! // ldi r16, 0x2a ; rjmp .-2
//! let image = FirmwareImage::new().with_region(0, vec![0x0a, 0xe2, 0xff, 0xcf]);
//! let mut mcu = Mcu::new(&device::lookup("atmega328p").unwrap(), &image).unwrap();
//!
//! mcu.step().unwrap();
//! assert_eq!(mcu.data()[16], 0x2a);
//! assert_eq!(mcu.pc(), 2);
//! ```

/// Common types and constants (data-space layout, errors, register pairs).
pub mod common;
/// Device prototypes and run configuration.
pub mod config;
/// Execution core (memory, stack, step loop, handlers).
pub mod core;
/// Built-in device catalog.
pub mod device;
/// Instruction set (catalog, operands, decoded instructions, disassembler).
pub mod isa;
/// Image decoding, simulator lifecycle, and telemetry.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Run configuration; use `SimConfig::default()` or deserialize from JSON.
pub use crate::config::{DevicePrototype, SimConfig};
/// The execution core; holds memory, PC, and the decoded program.
pub use crate::core::Mcu;
/// Parsed firmware image consumed by the decoder.
pub use crate::sim::FirmwareImage;
/// Threaded lifecycle wrapper around the core.
pub use crate::sim::Simulator;
