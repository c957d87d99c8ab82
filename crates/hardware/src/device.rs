//! Built-in device catalog.
//!
//! Maps device identifiers to [`DevicePrototype`]s for the classic megaAVR
//! parts. Every entry keeps SPL/SPH at I/O 0x3D/0x3E (data 0x5D/0x5E). Parts
//! with more than 128 KiB of flash need a 22-bit program counter and are in
//! the wide-address class.

use crate::common::ConfigError;
use crate::config::DevicePrototype;

/// Identifier used when the host does not pick a device.
pub const DEFAULT_DEVICE: &str = "atmega328p";

const SPL: u16 = 0x5D;
const SPH: u16 = 0x5E;

struct Entry {
    name: &'static str,
    flash: u32,
    sram: u32,
    eeprom: u32,
    wide: bool,
}

const fn entry(name: &'static str, flash: u32, sram: u32, eeprom: u32, wide: bool) -> Entry {
    Entry {
        name,
        flash,
        sram,
        eeprom,
        wide,
    }
}

static DEVICES: &[Entry] = &[
    entry("atmega8", 8 * 1024, 1024, 512, false),
    entry("atmega16", 16 * 1024, 1024, 512, false),
    entry("atmega168", 16 * 1024, 1024, 512, false),
    entry("atmega328p", 32 * 1024, 2048, 1024, false),
    entry("atmega32u4", 32 * 1024, 2560, 1024, false),
    entry("atmega128", 128 * 1024, 4096, 4096, false),
    entry("atmega1280", 128 * 1024, 8192, 4096, false),
    entry("atmega2560", 256 * 1024, 8192, 4096, true),
];

impl Entry {
    fn prototype(&self) -> DevicePrototype {
        DevicePrototype {
            name: self.name.to_string(),
            program_memory_size: self.flash,
            sram_size: self.sram,
            eeprom_size: self.eeprom,
            stack_pointer_low_addr: SPL,
            stack_pointer_high_addr: SPH,
            is_wide_address: self.wide,
        }
    }
}

/// Looks up a device by identifier (case-insensitive).
///
/// # Errors
///
/// Returns [`ConfigError::UnknownDevice`] if no built-in device matches `id`.
pub fn lookup(id: &str) -> Result<DevicePrototype, ConfigError> {
    DEVICES
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(id))
        .map(Entry::prototype)
        .ok_or_else(|| ConfigError::UnknownDevice(id.to_string()))
}

/// Identifiers of every built-in device, in catalog order.
pub fn names() -> impl Iterator<Item = &'static str> {
    DEVICES.iter().map(|d| d.name)
}
