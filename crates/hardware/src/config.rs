//! Configuration system for the AVR simulator.
//!
//! This module defines the configuration structures used to parameterize the
//! simulator. It provides:
//! 1. **Defaults:** Baseline run-loop pacing and telemetry settings.
//! 2. **Device Prototype:** The static memory layout of one microcontroller variant.
//! 3. **Run Configuration:** Pacing, load-time listing, and telemetry options.
//!
//! Configuration can be deserialized from JSON, or use `SimConfig::default()`
//! and a prototype from the built-in [`device`](crate::device) catalog.

use serde::Deserialize;

use crate::common::ConfigError;
use crate::common::constants::{
    DATA_SECTION_OFFSET, DEFAULT_STEP_DELAY_US, DEFAULT_TELEMETRY_INTERVAL_MS, MAX_NARROW_PROGRAM_MEMORY,
    MAX_PROGRAM_MEMORY,
};

/// Default configuration constants for the simulator.
mod defaults {
    use super::{DEFAULT_STEP_DELAY_US, DEFAULT_TELEMETRY_INTERVAL_MS};

    /// Pause after every executed instruction.
    pub const STEP_DELAY_US: u64 = DEFAULT_STEP_DELAY_US;

    /// Telemetry sampling period.
    pub const TELEMETRY_INTERVAL_MS: u64 = DEFAULT_TELEMETRY_INTERVAL_MS;
}

/// Static description of one microcontroller variant.
///
/// # Examples
///
/// ```
/// use avrsim_core::config::DevicePrototype;
///
/// let json = r#"{
///     "name": "atmega328p",
///     "program_memory_size": 32768,
///     "sram_size": 2048,
///     "eeprom_size": 1024,
///     "stack_pointer_low_addr": 93,
///     "stack_pointer_high_addr": 94,
///     "is_wide_address": false
/// }"#;
///
/// let device = DevicePrototype::from_json(json).unwrap();
/// assert_eq!(device.data_memory_size(), 0x100 + 2048);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DevicePrototype {
    /// Device identifier, e.g. `atmega328p`.
    pub name: String,
    /// Flash size in bytes.
    pub program_memory_size: u32,
    /// Internal SRAM size in bytes (the data section).
    pub sram_size: u32,
    /// EEPROM size in bytes.
    pub eeprom_size: u32,
    /// Data-space address of SPL.
    pub stack_pointer_low_addr: u16,
    /// Data-space address of SPH.
    pub stack_pointer_high_addr: u16,
    /// Whether return addresses take three bytes on the stack.
    pub is_wide_address: bool,
}

impl DevicePrototype {
    /// Parses and validates a prototype from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and
    /// [`ConfigError::InvalidDevice`] if the prototype fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let device: Self = serde_json::from_str(json)?;
        device.validate()?;
        Ok(device)
    }

    /// Size of the unified register/I-O/SRAM data space.
    pub const fn data_memory_size(&self) -> usize {
        DATA_SECTION_OFFSET + self.sram_size as usize
    }

    /// Number of bytes a return address occupies on the stack.
    pub const fn return_address_size(&self) -> u16 {
        if self.is_wide_address { 3 } else { 2 }
    }

    /// Checks that the prototype describes a layout the core can model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDevice`] naming the first failed check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |reason: &str| -> Result<(), ConfigError> {
            Err(ConfigError::InvalidDevice {
                name: self.name.clone(),
                reason: reason.to_string(),
            })
        };

        if self.program_memory_size == 0 || self.sram_size == 0 || self.eeprom_size == 0 {
            return fail("memory sizes must be non-zero");
        }
        if !self.program_memory_size.is_multiple_of(2) {
            return fail("program memory must hold whole instruction words");
        }
        if self.program_memory_size > MAX_PROGRAM_MEMORY {
            return fail("program memory exceeds the 22-bit word address range");
        }
        if !self.is_wide_address && self.program_memory_size > MAX_NARROW_PROGRAM_MEMORY {
            return fail("program memory above 128 KiB needs three-byte return addresses");
        }
        if self.data_memory_size() > usize::from(u16::MAX) {
            return fail("data space exceeds the 16-bit stack pointer range");
        }
        if self.stack_pointer_high_addr != self.stack_pointer_low_addr.wrapping_add(1) {
            return fail("SPH must sit directly above SPL");
        }
        if usize::from(self.stack_pointer_high_addr) >= DATA_SECTION_OFFSET {
            return fail("stack pointer must live in the register/I-O region");
        }
        Ok(())
    }
}

/// Memory word reported alongside each telemetry sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Probe {
    /// The 16-bit word the Y register points at.
    ///
    /// avr-gcc uses Y as the frame pointer, so this tracks the first local of
    /// the current frame.
    #[default]
    YPointer,
    /// The 16-bit word at a fixed data-space address.
    Address(u16),
}

/// Telemetry timer settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Whether the periodic observer runs at all.
    #[serde(default = "TelemetryConfig::default_enabled")]
    pub enabled: bool,

    /// Sampling period in milliseconds.
    #[serde(default = "TelemetryConfig::default_interval_ms")]
    pub interval_ms: u64,

    /// Memory word included in every sample.
    #[serde(default)]
    pub probe: Probe,
}

impl TelemetryConfig {
    const fn default_enabled() -> bool {
        true
    }

    const fn default_interval_ms() -> u64 {
        defaults::TELEMETRY_INTERVAL_MS
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            interval_ms: Self::default_interval_ms(),
            probe: Probe::default(),
        }
    }
}

/// Root run configuration.
///
/// # Examples
///
/// ```
/// use avrsim_core::config::{Probe, SimConfig};
///
/// let config = SimConfig::from_json(r#"{
///     "step_delay_us": 0,
///     "telemetry": { "interval_ms": 250, "probe": { "Address": 256 } }
/// }"#).unwrap();
///
/// assert_eq!(config.step_delay_us, 0);
/// assert!(config.telemetry.enabled);
/// assert_eq!(config.telemetry.probe, Probe::Address(0x100));
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    /// Pause after every executed instruction, in microseconds. Zero runs
    /// free.
    #[serde(default = "SimConfig::default_step_delay_us")]
    pub step_delay_us: u64,

    /// Log the disassembly listing at debug level after loading.
    #[serde(default)]
    pub listing: bool,

    /// Periodic observer settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl SimConfig {
    /// Parses a run configuration from JSON. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document does not deserialize.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    const fn default_step_delay_us() -> u64 {
        defaults::STEP_DELAY_US
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_delay_us: Self::default_step_delay_us(),
            listing: false,
            telemetry: TelemetryConfig::default(),
        }
    }
}
