//! Operand Encodings and Resolvers.
//!
//! Every catalog entry names up to two operand kinds. A kind knows where its
//! bits live in the instruction word (and, for two-word instructions, in the
//! following word) and how to turn them into a concrete value:
//! - register and I/O operands resolve to data-space addresses,
//! - immediates resolve to their unsigned value,
//! - branch targets resolve in program-counter units (bytes): relative kinds
//!   give a signed offset from the *next* instruction, absolute kinds an
//!   absolute byte address.
//!
//! Resolvers are pure and total: any word accepted by a prototype resolves.

use crate::common::constants::{IO_BASE, X_REGISTER, Y_REGISTER, Z_REGISTER};

/// Operand encoding kinds used by the instruction catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// No operand.
    None,
    /// 5-bit destination register, bits 8:4.
    Reg5D,
    /// 5-bit source register, bit 9 and bits 3:0.
    Reg5R,
    /// Upper-half destination register r16..r31, bits 7:4.
    RegHighD,
    /// Upper-half source register r16..r31, bits 3:0.
    RegHighR,
    /// Destination register r16..r23, bits 6:4.
    Reg3D,
    /// Source register r16..r23, bits 2:0.
    Reg3R,
    /// Even destination register of a pair, bits 7:4.
    PairD,
    /// Even source register of a pair, bits 3:0.
    PairR,
    /// Upper word pair r24/r26/r28/r30, bits 5:4.
    WordPair,
    /// 4-bit immediate, bits 7:4.
    Imm4,
    /// 6-bit immediate, bits 7:6 and 3:0.
    Imm6,
    /// 8-bit immediate, bits 11:8 and 3:0.
    Imm8,
    /// Lower 32 I/O registers, bits 7:3, as a data-space address.
    Io5,
    /// 64 I/O registers, bits 10:9 and 3:0, as a data-space address.
    Io6,
    /// Bit number, bits 2:0.
    Bit3,
    /// Status register bit, bits 2:0.
    SregBitLow,
    /// Status register bit, bits 6:4.
    SregBitHigh,
    /// 7-bit signed word offset, bits 9:3.
    Rel7,
    /// 12-bit signed word offset, bits 11:0.
    Rel12,
    /// 22-bit absolute word address split over both words.
    Abs22,
    /// 16-bit data-space address held in the second word.
    Addr16,
    /// 6-bit displacement from Y.
    DispY,
    /// 6-bit displacement from Z.
    DispZ,
    /// Indirect through X.
    PtrX,
    /// Indirect through X, post-increment.
    PtrXInc,
    /// Indirect through X, pre-decrement.
    PtrXDec,
    /// Indirect through Y, post-increment.
    PtrYInc,
    /// Indirect through Y, pre-decrement.
    PtrYDec,
    /// Indirect through Z.
    PtrZ,
    /// Indirect through Z, post-increment.
    PtrZInc,
    /// Indirect through Z, pre-decrement.
    PtrZDec,
}

/// Sign-extends the low `bits` bits of `value`.
#[inline]
fn sign_extend(value: u16, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((i32::from(value)) << shift) >> shift
}

impl OperandKind {
    /// Resolves the operand from the instruction word(s).
    ///
    /// # Arguments
    ///
    /// * `word` - The first instruction word.
    /// * `next_word` - The second word of a two-word instruction, otherwise 0.
    /// * `_addr` - Byte address of the instruction. Targets are expressed
    ///   relative to the program counter, so no kind needs it today.
    pub fn resolve(self, word: u16, next_word: u16, _addr: u32) -> i32 {
        let w = i32::from(word);
        match self {
            Self::None => 0,
            Self::Reg5D => (w >> 4) & 0x1F,
            Self::Reg5R => ((w >> 5) & 0x10) | (w & 0x0F),
            Self::RegHighD => 16 + ((w >> 4) & 0x0F),
            Self::RegHighR => 16 + (w & 0x0F),
            Self::Reg3D => 16 + ((w >> 4) & 0x07),
            Self::Reg3R => 16 + (w & 0x07),
            Self::PairD => ((w >> 4) & 0x0F) * 2,
            Self::PairR => (w & 0x0F) * 2,
            Self::WordPair => 24 + ((w >> 4) & 0x03) * 2,
            Self::Imm4 => (w >> 4) & 0x0F,
            Self::Imm6 => ((w >> 2) & 0x30) | (w & 0x0F),
            Self::Imm8 => ((w >> 4) & 0xF0) | (w & 0x0F),
            Self::Io5 => i32::from(IO_BASE) + ((w >> 3) & 0x1F),
            Self::Io6 => i32::from(IO_BASE) + (((w >> 5) & 0x30) | (w & 0x0F)),
            Self::Bit3 | Self::SregBitLow => w & 0x07,
            Self::SregBitHigh => (w >> 4) & 0x07,
            Self::Rel7 => sign_extend((word >> 3) & 0x7F, 7) * 2,
            Self::Rel12 => sign_extend(word & 0x0FFF, 12) * 2,
            Self::Abs22 => {
                let high = ((w >> 3) & 0x3E) | (w & 0x01);
                ((high << 16) | i32::from(next_word)) * 2
            }
            Self::Addr16 => i32::from(next_word),
            Self::DispY | Self::DispZ => ((w >> 8) & 0x20) | ((w >> 7) & 0x18) | (w & 0x07),
            Self::PtrX | Self::PtrXInc | Self::PtrXDec => i32::from(X_REGISTER),
            Self::PtrYInc | Self::PtrYDec => i32::from(Y_REGISTER),
            Self::PtrZ | Self::PtrZInc | Self::PtrZDec => i32::from(Z_REGISTER),
        }
    }

    /// Whether the resolved value is a signed offset from the next instruction.
    pub const fn is_relative(self) -> bool {
        matches!(self, Self::Rel7 | Self::Rel12)
    }

    /// Whether this kind needs the second instruction word.
    pub const fn uses_next_word(self) -> bool {
        matches!(self, Self::Abs22 | Self::Addr16)
    }
}
