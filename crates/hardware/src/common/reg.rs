//! Register-Pair Views.
//!
//! AVR pointer registers (X, Y, Z) and the stack pointer are pairs of
//! ordinary bytes in data space. This module provides:
//! 1. **`RegPair`:** A copyable descriptor naming the low byte of a pair.
//! 2. **`WordMut`:** A borrowed 16-bit window with arithmetic operators.
//!
//! Neither type owns memory. Every read composes the two underlying bytes and
//! every write decomposes the value again, low byte first, so byte-level writes
//! through the same addresses stay visible through the view and vice versa.

use std::ops::{AddAssign, SubAssign};

use super::constants::{X_REGISTER, Y_REGISTER, Z_REGISTER};

/// Descriptor of a 16-bit little-endian register pair in data memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegPair {
    addr: u16,
}

impl RegPair {
    /// The X index register (r27:r26).
    pub const X: Self = Self::at(X_REGISTER);
    /// The Y index register (r29:r28).
    pub const Y: Self = Self::at(Y_REGISTER);
    /// The Z index register (r31:r30).
    pub const Z: Self = Self::at(Z_REGISTER);

    /// Creates a descriptor whose low byte lives at `addr`.
    pub const fn at(addr: u16) -> Self {
        Self { addr }
    }

    /// Data-space address of the low byte.
    pub const fn addr(self) -> u16 {
        self.addr
    }

    /// Reads the pair as a 16-bit value.
    ///
    /// # Panics
    ///
    /// Panics if the pair does not lie inside `mem`. Pairs are only built for
    /// fixed architectural addresses or validated device offsets.
    #[inline]
    pub const fn get(self, mem: &[u8]) -> u16 {
        let lo = self.addr as usize;
        u16::from_le_bytes([mem[lo], mem[lo + 1]])
    }

    /// Writes a 16-bit value into the pair.
    ///
    /// # Panics
    ///
    /// Panics if the pair does not lie inside `mem`.
    #[inline]
    pub const fn set(self, mem: &mut [u8], val: u16) {
        let lo = self.addr as usize;
        let [l, h] = val.to_le_bytes();
        mem[lo] = l;
        mem[lo + 1] = h;
    }

    /// Borrows `mem` mutably and returns an operator-friendly view.
    #[inline]
    pub const fn view(self, mem: &mut [u8]) -> WordMut<'_> {
        WordMut { mem, pair: self }
    }
}

/// Mutable 16-bit window over two adjacent bytes of data memory.
///
/// ```
/// use avrsim_core::common::RegPair;
///
/// let mut mem = [0u8; 0x20];
/// let mut y = RegPair::Y.view(&mut mem);
/// y.set(0x08FF);
/// y += 1;
/// assert_eq!(y.get(), 0x0900);
/// assert_eq!(mem[0x1C..0x1E], [0x00, 0x09]);
/// ```
#[derive(Debug)]
pub struct WordMut<'a> {
    mem: &'a mut [u8],
    pair: RegPair,
}

impl WordMut<'_> {
    /// Current 16-bit value.
    #[inline]
    pub const fn get(&self) -> u16 {
        self.pair.get(self.mem)
    }

    /// Overwrites both bytes.
    #[inline]
    pub const fn set(&mut self, val: u16) {
        self.pair.set(self.mem, val);
    }

    /// Adds a signed delta with 16-bit wraparound.
    #[inline]
    pub const fn add_signed(&mut self, delta: i32) {
        let val = self.get().wrapping_add(delta as u16);
        self.set(val);
    }

    /// Increments, then returns the new value.
    pub fn pre_inc(&mut self) -> u16 {
        *self += 1;
        self.get()
    }

    /// Returns the current value, then increments.
    pub fn post_inc(&mut self) -> u16 {
        let old = self.get();
        *self += 1;
        old
    }

    /// Decrements, then returns the new value.
    pub fn pre_dec(&mut self) -> u16 {
        *self -= 1;
        self.get()
    }

    /// Returns the current value, then decrements.
    pub fn post_dec(&mut self) -> u16 {
        let old = self.get();
        *self -= 1;
        old
    }
}

impl AddAssign<u16> for WordMut<'_> {
    fn add_assign(&mut self, rhs: u16) {
        let val = self.get().wrapping_add(rhs);
        self.set(val);
    }
}

impl SubAssign<u16> for WordMut<'_> {
    fn sub_assign(&mut self, rhs: u16) {
        let val = self.get().wrapping_sub(rhs);
        self.set(val);
    }
}
