//! Simulation lifecycle, image decoding, and telemetry.
//!
//! Provides the decoder that turns a firmware image into an instruction
//! table, the `Simulator` that runs the core on its own thread, and the
//! periodic telemetry observer.

/// Firmware image decoding and the code/data split.
pub mod loader;

/// Simulator lifecycle and the execution thread.
pub mod simulator;

/// Periodic throughput sampling.
pub mod telemetry;

pub use loader::{DecodedImage, FirmwareImage, decode, decode_with};
pub use simulator::{RunReport, SimState, Simulator};
pub use telemetry::Sample;
