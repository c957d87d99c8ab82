//! Program builder.
//!
//! Encodes AVR instructions into little-endian bytes, one call per
//! instruction, so tests read like assembly listings.

use avrsim_core::FirmwareImage;

#[derive(Debug, Default, Clone)]
pub struct ProgramBuilder {
    bytes: Vec<u8>,
}

fn rd_rr(base: u16, d: u8, r: u8) -> u16 {
    let (d, r) = (u16::from(d), u16::from(r));
    base | ((r & 0x10) << 5) | ((d & 0x1F) << 4) | (r & 0x0F)
}

fn disp(base: u16, reg: u8, q: u8) -> u16 {
    let (reg, q) = (u16::from(reg), u16::from(q));
    base | ((q & 0x20) << 8) | ((q & 0x18) << 7) | ((reg & 0x1F) << 4) | (q & 0x07)
}

fn io(base: u16, reg: u8, a: u8) -> u16 {
    let (reg, a) = (u16::from(reg), u16::from(a));
    base | ((a & 0x30) << 5) | ((reg & 0x1F) << 4) | (a & 0x0F)
}

fn abs22(base: u16, word_addr: u32) -> [u16; 2] {
    let high = (((word_addr >> 17) & 0x1F) << 4) as u16 | ((word_addr >> 16) & 1) as u16;
    [base | high, (word_addr & 0xFFFF) as u16]
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word(mut self, w: u16) -> Self {
        self.bytes.extend_from_slice(&w.to_le_bytes());
        self
    }

    pub fn bytes(mut self, b: &[u8]) -> Self {
        self.bytes.extend_from_slice(b);
        self
    }

    // --- Helpers for Common Instructions ---

    pub fn nop(self) -> Self {
        self.word(0x0000)
    }

    /// Pads with `n` nops.
    pub fn nops(mut self, n: usize) -> Self {
        for _ in 0..n {
            self = self.nop();
        }
        self
    }

    pub fn ldi(self, d: u8, k: u8) -> Self {
        let (d, k) = (u16::from(d - 16), u16::from(k));
        self.word(0xE000 | ((k & 0xF0) << 4) | (d << 4) | (k & 0x0F))
    }

    pub fn ser(self, d: u8) -> Self {
        self.word(0xEF0F | (u16::from(d - 16) << 4))
    }

    pub fn eor(self, d: u8, r: u8) -> Self {
        self.word(rd_rr(0x2400, d, r))
    }

    pub fn add(self, d: u8, r: u8) -> Self {
        self.word(rd_rr(0x0C00, d, r))
    }

    pub fn mov(self, d: u8, r: u8) -> Self {
        self.word(rd_rr(0x2C00, d, r))
    }

    pub fn movw(self, d: u8, r: u8) -> Self {
        self.word(0x0100 | (u16::from(d / 2) << 4) | u16::from(r / 2))
    }

    pub fn adiw(self, d: u8, k: u8) -> Self {
        let (pair, k) = (u16::from((d - 24) / 2), u16::from(k));
        self.word(0x9600 | ((k & 0x30) << 2) | (pair << 4) | (k & 0x0F))
    }

    pub fn ldd_y(self, d: u8, q: u8) -> Self {
        self.word(disp(0x8008, d, q))
    }

    pub fn ldd_z(self, d: u8, q: u8) -> Self {
        self.word(disp(0x8000, d, q))
    }

    pub fn std_y(self, q: u8, r: u8) -> Self {
        self.word(disp(0x8208, r, q))
    }

    pub fn std_z(self, q: u8, r: u8) -> Self {
        self.word(disp(0x8200, r, q))
    }

    pub fn in_(self, d: u8, a: u8) -> Self {
        self.word(io(0xB000, d, a))
    }

    pub fn out(self, a: u8, r: u8) -> Self {
        self.word(io(0xB800, r, a))
    }

    pub fn push(self, r: u8) -> Self {
        self.word(0x920F | (u16::from(r) << 4))
    }

    pub fn pop(self, d: u8) -> Self {
        self.word(0x900F | (u16::from(d) << 4))
    }

    pub fn bset(self, s: u8) -> Self {
        self.word(0x9408 | (u16::from(s) << 4))
    }

    pub fn bclr(self, s: u8) -> Self {
        self.word(0x9488 | (u16::from(s) << 4))
    }

    /// `rjmp .+2k`; `k` is in words.
    pub fn rjmp(self, k: i16) -> Self {
        self.word(0xC000 | (k as u16 & 0x0FFF))
    }

    /// `rcall .+2k`; `k` is in words.
    pub fn rcall(self, k: i16) -> Self {
        self.word(0xD000 | (k as u16 & 0x0FFF))
    }

    /// `jmp`; `word_addr` is a word address.
    pub fn jmp(self, word_addr: u32) -> Self {
        let [a, b] = abs22(0x940C, word_addr);
        self.word(a).word(b)
    }

    /// `call`; `word_addr` is a word address.
    pub fn call(self, word_addr: u32) -> Self {
        let [a, b] = abs22(0x940E, word_addr);
        self.word(a).word(b)
    }

    pub fn ret(self) -> Self {
        self.word(0x9508)
    }

    /// `rjmp .-2`, the end-of-code marker.
    pub fn halt(self) -> Self {
        self.rjmp(-1)
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }

    /// Single-region image loaded at address 0.
    pub fn image(self) -> FirmwareImage {
        FirmwareImage::new().with_region(0, self.bytes)
    }
}
