//! AVR Instruction Catalog.
//!
//! This module holds the ordered table of instruction patterns the decoder
//! matches against. It provides:
//! 1. **Mnemonics:** A closed enum naming every instruction family.
//! 2. **Prototypes:** Opcode, mask, length, and operand kinds per pattern.
//! 3. **Lookup:** First-match search in catalog order.
//!
//! Order matters. Several encodings overlap (`ser` is `ldi r, 0xFF`, the
//! fixed-word system instructions sit inside the one-register group), so the
//! more specific pattern always precedes the general one it shadows.

use std::borrow::Cow;

use super::operands::OperandKind;

/// Instruction families known to the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Mnemonic {
    Nop,
    Movw,
    Muls,
    Mulsu,
    Fmul,
    Fmuls,
    Fmulsu,
    Cpc,
    Sbc,
    Add,
    Cpse,
    Cp,
    Sub,
    Adc,
    And,
    Eor,
    Or,
    Mov,
    Mul,
    Cpi,
    Sbci,
    Subi,
    Ori,
    Andi,
    Ser,
    Ldi,
    LddY,
    LddZ,
    StdY,
    StdZ,
    Lds,
    Sts,
    Ld,
    St,
    Lpm,
    Elpm,
    Spm,
    Xch,
    Las,
    Lac,
    Lat,
    Push,
    Pop,
    Com,
    Neg,
    Swap,
    Inc,
    Asr,
    Lsr,
    Ror,
    Dec,
    Des,
    Bset,
    Bclr,
    Ijmp,
    Eijmp,
    Icall,
    Eicall,
    Ret,
    Reti,
    Sleep,
    Break,
    Wdr,
    Jmp,
    Call,
    Adiw,
    Sbiw,
    Cbi,
    Sbic,
    Sbi,
    Sbis,
    In,
    Out,
    Rjmp,
    Rcall,
    Brbs,
    Brbc,
    Bld,
    Bst,
    Sbrc,
    Sbrs,
}

impl Mnemonic {
    /// Assembler spelling.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nop => "nop",
            Self::Movw => "movw",
            Self::Muls => "muls",
            Self::Mulsu => "mulsu",
            Self::Fmul => "fmul",
            Self::Fmuls => "fmuls",
            Self::Fmulsu => "fmulsu",
            Self::Cpc => "cpc",
            Self::Sbc => "sbc",
            Self::Add => "add",
            Self::Cpse => "cpse",
            Self::Cp => "cp",
            Self::Sub => "sub",
            Self::Adc => "adc",
            Self::And => "and",
            Self::Eor => "eor",
            Self::Or => "or",
            Self::Mov => "mov",
            Self::Mul => "mul",
            Self::Cpi => "cpi",
            Self::Sbci => "sbci",
            Self::Subi => "subi",
            Self::Ori => "ori",
            Self::Andi => "andi",
            Self::Ser => "ser",
            Self::Ldi => "ldi",
            Self::LddY | Self::LddZ => "ldd",
            Self::StdY | Self::StdZ => "std",
            Self::Lds => "lds",
            Self::Sts => "sts",
            Self::Ld => "ld",
            Self::St => "st",
            Self::Lpm => "lpm",
            Self::Elpm => "elpm",
            Self::Spm => "spm",
            Self::Xch => "xch",
            Self::Las => "las",
            Self::Lac => "lac",
            Self::Lat => "lat",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Com => "com",
            Self::Neg => "neg",
            Self::Swap => "swap",
            Self::Inc => "inc",
            Self::Asr => "asr",
            Self::Lsr => "lsr",
            Self::Ror => "ror",
            Self::Dec => "dec",
            Self::Des => "des",
            Self::Bset => "bset",
            Self::Bclr => "bclr",
            Self::Ijmp => "ijmp",
            Self::Eijmp => "eijmp",
            Self::Icall => "icall",
            Self::Eicall => "eicall",
            Self::Ret => "ret",
            Self::Reti => "reti",
            Self::Sleep => "sleep",
            Self::Break => "break",
            Self::Wdr => "wdr",
            Self::Jmp => "jmp",
            Self::Call => "call",
            Self::Adiw => "adiw",
            Self::Sbiw => "sbiw",
            Self::Cbi => "cbi",
            Self::Sbic => "sbic",
            Self::Sbi => "sbi",
            Self::Sbis => "sbis",
            Self::In => "in",
            Self::Out => "out",
            Self::Rjmp => "rjmp",
            Self::Rcall => "rcall",
            Self::Brbs => "brbs",
            Self::Brbc => "brbc",
            Self::Bld => "bld",
            Self::Bst => "bst",
            Self::Sbrc => "sbrc",
            Self::Sbrs => "sbrs",
        }
    }
}

/// One pattern in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstructionPrototype {
    /// Stable identifier, unique within a catalog.
    pub id: u32,
    /// Instruction family.
    pub mnemonic: Mnemonic,
    /// Fixed bits after masking.
    pub opcode: u16,
    /// Which bits of the word are fixed.
    pub mask: u16,
    /// Length in 16-bit words (1 or 2).
    pub word_count: u8,
    /// Encoding of the first operand.
    pub operand1: OperandKind,
    /// Encoding of the second operand.
    pub operand2: OperandKind,
}

impl InstructionPrototype {
    /// Builds a prototype. Usable in constant tables.
    pub const fn new(
        id: u32,
        mnemonic: Mnemonic,
        opcode: u16,
        mask: u16,
        word_count: u8,
        operand1: OperandKind,
        operand2: OperandKind,
    ) -> Self {
        Self {
            id,
            mnemonic,
            opcode,
            mask,
            word_count,
            operand1,
            operand2,
        }
    }

    /// Whether `word` is an encoding of this pattern.
    #[inline]
    pub const fn matches(&self, word: u16) -> bool {
        word & self.mask == self.opcode
    }

    /// Instruction length in bytes.
    #[inline]
    pub const fn byte_len(&self) -> u32 {
        self.word_count as u32 * 2
    }
}

/// Ordered instruction-pattern table.
///
/// The built-in AVR table is a `static` borrowed by [`Catalog::avr`]; tests and
/// extensions can build their own with [`Catalog::new`].
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Cow<'static, [InstructionPrototype]>,
}

impl Catalog {
    /// Wraps a caller-supplied table. Entries are searched in the given order.
    pub const fn new(entries: Vec<InstructionPrototype>) -> Self {
        Self {
            entries: Cow::Owned(entries),
        }
    }

    /// The built-in AVR instruction set.
    pub const fn avr() -> &'static Self {
        &AVR
    }

    /// Returns the first prototype matching `word`, or `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avrsim_core::isa::catalog::{Catalog, Mnemonic};
    ///
    /// let avr = Catalog::avr();
    /// assert_eq!(avr.lookup(0xEF0F).map(|p| p.mnemonic), Some(Mnemonic::Ser));
    /// assert_eq!(avr.lookup(0xE50A).map(|p| p.mnemonic), Some(Mnemonic::Ldi));
    /// ```
    pub fn lookup(&self, word: u16) -> Option<&InstructionPrototype> {
        self.entries.iter().find(|p| p.matches(word))
    }

    /// All entries, in match order.
    pub fn entries(&self) -> &[InstructionPrototype] {
        &self.entries
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no patterns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static AVR: Catalog = Catalog {
    entries: Cow::Borrowed(AVR_INSTRUCTIONS),
};

use Mnemonic as M;
use OperandKind as K;

const fn one(id: u32, m: Mnemonic, opcode: u16, mask: u16, a: OperandKind, b: OperandKind) -> InstructionPrototype {
    InstructionPrototype::new(id, m, opcode, mask, 1, a, b)
}

const fn two(id: u32, m: Mnemonic, opcode: u16, mask: u16, a: OperandKind, b: OperandKind) -> InstructionPrototype {
    InstructionPrototype::new(id, m, opcode, mask, 2, a, b)
}

const FIXED: u16 = 0xFFFF;
const TWO_REG: u16 = 0xFC00;
const IMM_REG: u16 = 0xF000;
const DISP: u16 = 0xD208;
const ONE_REG: u16 = 0xFE0F;

#[rustfmt::skip]
static AVR_INSTRUCTIONS: &[InstructionPrototype] = &[
    // Fixed words.
    one(1,   M::Nop,    0x0000, FIXED,  K::None,        K::None),
    one(2,   M::Ijmp,   0x9409, FIXED,  K::None,        K::None),
    one(3,   M::Eijmp,  0x9419, FIXED,  K::None,        K::None),
    one(4,   M::Ret,    0x9508, FIXED,  K::None,        K::None),
    one(5,   M::Icall,  0x9509, FIXED,  K::None,        K::None),
    one(6,   M::Reti,   0x9518, FIXED,  K::None,        K::None),
    one(7,   M::Eicall, 0x9519, FIXED,  K::None,        K::None),
    one(8,   M::Sleep,  0x9588, FIXED,  K::None,        K::None),
    one(9,   M::Break,  0x9598, FIXED,  K::None,        K::None),
    one(10,  M::Wdr,    0x95A8, FIXED,  K::None,        K::None),
    one(11,  M::Lpm,    0x95C8, FIXED,  K::None,        K::None),
    one(12,  M::Elpm,   0x95D8, FIXED,  K::None,        K::None),
    one(13,  M::Spm,    0x95E8, FIXED,  K::None,        K::None),
    one(14,  M::Spm,    0x95F8, FIXED,  K::PtrZInc,     K::None),

    // Register pairs and fractional multiplies.
    one(15,  M::Movw,   0x0100, 0xFF00, K::PairD,       K::PairR),
    one(16,  M::Muls,   0x0200, 0xFF00, K::RegHighD,    K::RegHighR),
    one(17,  M::Mulsu,  0x0300, 0xFF88, K::Reg3D,       K::Reg3R),
    one(18,  M::Fmul,   0x0308, 0xFF88, K::Reg3D,       K::Reg3R),
    one(19,  M::Fmuls,  0x0380, 0xFF88, K::Reg3D,       K::Reg3R),
    one(20,  M::Fmulsu, 0x0388, 0xFF88, K::Reg3D,       K::Reg3R),

    // Two registers.
    one(21,  M::Cpc,    0x0400, TWO_REG, K::Reg5D,      K::Reg5R),
    one(22,  M::Sbc,    0x0800, TWO_REG, K::Reg5D,      K::Reg5R),
    one(23,  M::Add,    0x0C00, TWO_REG, K::Reg5D,      K::Reg5R),
    one(24,  M::Cpse,   0x1000, TWO_REG, K::Reg5D,      K::Reg5R),
    one(25,  M::Cp,     0x1400, TWO_REG, K::Reg5D,      K::Reg5R),
    one(26,  M::Sub,    0x1800, TWO_REG, K::Reg5D,      K::Reg5R),
    one(27,  M::Adc,    0x1C00, TWO_REG, K::Reg5D,      K::Reg5R),
    one(28,  M::And,    0x2000, TWO_REG, K::Reg5D,      K::Reg5R),
    one(29,  M::Eor,    0x2400, TWO_REG, K::Reg5D,      K::Reg5R),
    one(30,  M::Or,     0x2800, TWO_REG, K::Reg5D,      K::Reg5R),
    one(31,  M::Mov,    0x2C00, TWO_REG, K::Reg5D,      K::Reg5R),
    one(32,  M::Mul,    0x9C00, TWO_REG, K::Reg5D,      K::Reg5R),

    // Register and immediate.
    one(33,  M::Cpi,    0x3000, IMM_REG, K::RegHighD,   K::Imm8),
    one(34,  M::Sbci,   0x4000, IMM_REG, K::RegHighD,   K::Imm8),
    one(35,  M::Subi,   0x5000, IMM_REG, K::RegHighD,   K::Imm8),
    one(36,  M::Ori,    0x6000, IMM_REG, K::RegHighD,   K::Imm8),
    one(37,  M::Andi,   0x7000, IMM_REG, K::RegHighD,   K::Imm8),
    one(38,  M::Ser,    0xEF0F, 0xFF0F,  K::RegHighD,   K::None),
    one(39,  M::Ldi,    0xE000, IMM_REG, K::RegHighD,   K::Imm8),

    // Displacement loads and stores.
    one(40,  M::LddY,   0x8008, DISP,   K::Reg5D,       K::DispY),
    one(41,  M::LddZ,   0x8000, DISP,   K::Reg5D,       K::DispZ),
    one(42,  M::StdY,   0x8208, DISP,   K::DispY,       K::Reg5D),
    one(43,  M::StdZ,   0x8200, DISP,   K::DispZ,       K::Reg5D),

    // Loads.
    two(44,  M::Lds,    0x9000, ONE_REG, K::Reg5D,      K::Addr16),
    one(45,  M::Ld,     0x9001, ONE_REG, K::Reg5D,      K::PtrZInc),
    one(46,  M::Ld,     0x9002, ONE_REG, K::Reg5D,      K::PtrZDec),
    one(47,  M::Lpm,    0x9004, ONE_REG, K::Reg5D,      K::PtrZ),
    one(48,  M::Lpm,    0x9005, ONE_REG, K::Reg5D,      K::PtrZInc),
    one(49,  M::Elpm,   0x9006, ONE_REG, K::Reg5D,      K::PtrZ),
    one(50,  M::Elpm,   0x9007, ONE_REG, K::Reg5D,      K::PtrZInc),
    one(51,  M::Ld,     0x9009, ONE_REG, K::Reg5D,      K::PtrYInc),
    one(52,  M::Ld,     0x900A, ONE_REG, K::Reg5D,      K::PtrYDec),
    one(53,  M::Ld,     0x900C, ONE_REG, K::Reg5D,      K::PtrX),
    one(54,  M::Ld,     0x900D, ONE_REG, K::Reg5D,      K::PtrXInc),
    one(55,  M::Ld,     0x900E, ONE_REG, K::Reg5D,      K::PtrXDec),
    one(56,  M::Pop,    0x900F, ONE_REG, K::Reg5D,      K::None),

    // Stores.
    two(57,  M::Sts,    0x9200, ONE_REG, K::Addr16,     K::Reg5D),
    one(58,  M::St,     0x9201, ONE_REG, K::PtrZInc,    K::Reg5D),
    one(59,  M::St,     0x9202, ONE_REG, K::PtrZDec,    K::Reg5D),
    one(60,  M::Xch,    0x9204, ONE_REG, K::PtrZ,       K::Reg5D),
    one(61,  M::Las,    0x9205, ONE_REG, K::PtrZ,       K::Reg5D),
    one(62,  M::Lac,    0x9206, ONE_REG, K::PtrZ,       K::Reg5D),
    one(63,  M::Lat,    0x9207, ONE_REG, K::PtrZ,       K::Reg5D),
    one(64,  M::St,     0x9209, ONE_REG, K::PtrYInc,    K::Reg5D),
    one(65,  M::St,     0x920A, ONE_REG, K::PtrYDec,    K::Reg5D),
    one(66,  M::St,     0x920C, ONE_REG, K::PtrX,       K::Reg5D),
    one(67,  M::St,     0x920D, ONE_REG, K::PtrXInc,    K::Reg5D),
    one(68,  M::St,     0x920E, ONE_REG, K::PtrXDec,    K::Reg5D),
    one(69,  M::Push,   0x920F, ONE_REG, K::Reg5D,      K::None),

    // One register.
    one(70,  M::Com,    0x9400, ONE_REG, K::Reg5D,      K::None),
    one(71,  M::Neg,    0x9401, ONE_REG, K::Reg5D,      K::None),
    one(72,  M::Swap,   0x9402, ONE_REG, K::Reg5D,      K::None),
    one(73,  M::Inc,    0x9403, ONE_REG, K::Reg5D,      K::None),
    one(74,  M::Asr,    0x9405, ONE_REG, K::Reg5D,      K::None),
    one(75,  M::Lsr,    0x9406, ONE_REG, K::Reg5D,      K::None),
    one(76,  M::Ror,    0x9407, ONE_REG, K::Reg5D,      K::None),
    one(77,  M::Dec,    0x940A, ONE_REG, K::Reg5D,      K::None),
    one(78,  M::Des,    0x940B, 0xFF0F,  K::Imm4,       K::None),
    one(79,  M::Bset,   0x9408, 0xFF8F,  K::SregBitHigh, K::None),
    one(80,  M::Bclr,   0x9488, 0xFF8F,  K::SregBitHigh, K::None),

    // Absolute jumps.
    two(81,  M::Jmp,    0x940C, 0xFE0E, K::Abs22,       K::None),
    two(82,  M::Call,   0x940E, 0xFE0E, K::Abs22,       K::None),

    // Word immediates and I/O bits.
    one(83,  M::Adiw,   0x9600, 0xFF00, K::WordPair,    K::Imm6),
    one(84,  M::Sbiw,   0x9700, 0xFF00, K::WordPair,    K::Imm6),
    one(85,  M::Cbi,    0x9800, 0xFF00, K::Io5,         K::Bit3),
    one(86,  M::Sbic,   0x9900, 0xFF00, K::Io5,         K::Bit3),
    one(87,  M::Sbi,    0x9A00, 0xFF00, K::Io5,         K::Bit3),
    one(88,  M::Sbis,   0x9B00, 0xFF00, K::Io5,         K::Bit3),
    one(89,  M::In,     0xB000, 0xF800, K::Reg5D,       K::Io6),
    one(90,  M::Out,    0xB800, 0xF800, K::Io6,         K::Reg5D),

    // Relative control flow.
    one(91,  M::Rjmp,   0xC000, IMM_REG, K::Rel12,      K::None),
    one(92,  M::Rcall,  0xD000, IMM_REG, K::Rel12,      K::None),
    one(93,  M::Brbs,   0xF000, TWO_REG, K::SregBitLow, K::Rel7),
    one(94,  M::Brbc,   0xF400, TWO_REG, K::SregBitLow, K::Rel7),

    // Register bits.
    one(95,  M::Bld,    0xF800, 0xFE08, K::Reg5D,       K::Bit3),
    one(96,  M::Bst,    0xFA00, 0xFE08, K::Reg5D,       K::Bit3),
    one(97,  M::Sbrc,   0xFC00, 0xFE08, K::Reg5D,       K::Bit3),
    one(98,  M::Sbrs,   0xFE00, 0xFE08, K::Reg5D,       K::Bit3),
];
