//! Data Memory Access and the Stack.
//!
//! Handlers address data memory through computed addresses (index register
//! plus displacement, the stack pointer). Those come from guest state and may
//! point anywhere, so this module performs:
//! 1. **Guarded Access:** Out-of-range reads yield 0 and out-of-range writes are
//!    dropped, each with a warning, instead of panicking.
//! 2. **Byte Stack:** Pre-decrement push and post-increment pop.
//! 3. **Return Addresses:** Two or three bytes depending on the address width.

use tracing::warn;

use super::Mcu;

impl Mcu {
    /// Reads a data-space byte.
    ///
    /// # Arguments
    ///
    /// * `addr` - Data-space address; may be out of range.
    ///
    /// # Returns
    ///
    /// The byte, or 0 when `addr` lies outside data memory.
    #[inline]
    pub fn read_data(&self, addr: usize) -> u8 {
        self.data.get(addr).map_or_else(
            || {
                warn!(addr = format_args!("{addr:#06x}"), pc = format_args!("{:#06x}", self.pc), "read outside data memory");
                0
            },
            |byte| *byte,
        )
    }

    /// Writes a data-space byte. Out-of-range writes are dropped.
    #[inline]
    pub fn write_data(&mut self, addr: usize, val: u8) {
        if let Some(byte) = self.data.get_mut(addr) {
            *byte = val;
        } else {
            warn!(addr = format_args!("{addr:#06x}"), pc = format_args!("{:#06x}", self.pc), "write outside data memory dropped");
        }
    }

    /// Pushes one byte: `sp -= 1; mem[sp] = val`.
    pub fn push_byte(&mut self, val: u8) {
        let sp = self.sp().wrapping_sub(1);
        self.set_sp(sp);
        self.write_data(usize::from(sp), val);
    }

    /// Pops one byte: `val = mem[sp]; sp += 1`.
    pub fn pop_byte(&mut self) -> u8 {
        let sp = self.sp();
        let val = self.read_data(usize::from(sp));
        self.set_sp(sp.wrapping_add(1));
        val
    }

    /// Saves the program counter as a return address.
    ///
    /// The hardware word address (`pc / 2`) is stored most significant byte
    /// first at the lowest address: `[high, low]`, or `[high, mid, low]` on
    /// wide-address devices. No overflow check is made.
    pub fn push_return_address(&mut self) {
        let word = self.pc >> 1;
        let width = self.device.return_address_size();
        let sp = self.sp().wrapping_sub(width);
        self.set_sp(sp);

        let bytes = word.to_be_bytes();
        let start = bytes.len() - usize::from(width);
        for (i, byte) in bytes[start..].iter().enumerate() {
            self.write_data(usize::from(sp) + i, *byte);
        }
    }

    /// Restores the program counter from a return address saved by
    /// [`push_return_address`](Self::push_return_address).
    pub fn pop_return_address(&mut self) {
        let width = self.device.return_address_size();
        let sp = self.sp();

        let mut word = 0u32;
        for i in 0..usize::from(width) {
            word = (word << 8) | u32::from(self.read_data(usize::from(sp) + i));
        }

        self.set_sp(sp.wrapping_add(width));
        self.pc = word << 1;
    }
}
