//! Firmware Image Decoder.
//!
//! This module turns a parsed firmware image into the structures the execution
//! core runs from. It performs:
//! 1. **Allocation:** Program memory, the instruction table, and the data
//!    section, sized from the device prototype with fallible reservation.
//! 2. **Decoding:** Every chunk is walked word by word against the catalog;
//!    matches are resolved and stored at the byte address of their first word.
//! 3. **Section split:** The first `rjmp .-2` of a chunk (the self-loop avr-gcc
//!    emits after `main` returns) ends its code; the remaining bytes are
//!    initialized data and go to the data section at the same offset.
//!
//! The split is a toolchain heuristic. Images whose code contains a genuine
//! `rjmp .-2` before the end, or whose data does not follow the code in the
//! same chunk, decode differently than intended.
//!
//! Decoding never fails on image contents: unknown words, truncated two-word
//! instructions, and bytes outside the destination memory are collected as
//! [`DecodeIssue`]s and logged.

use std::collections::BTreeMap;
use std::mem;

use tracing::{debug, warn};

use crate::common::{DecodeIssue, SimError};
use crate::config::DevicePrototype;
use crate::isa::catalog::{Catalog, Mnemonic};
use crate::isa::instruction::{DecodedInstruction, InstructionTable};

/// Offset a sentinel `rjmp` jumps by: back onto itself.
const SENTINEL_OFFSET: i32 = -2;

/// A parsed firmware image: load address to bytes.
///
/// Produced by an external loader (hex parser, raw binary reader). Regions
/// are visited in ascending address order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirmwareImage {
    regions: BTreeMap<u32, Vec<u8>>,
}

impl FirmwareImage {
    /// Creates an empty image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region at `base`, replacing any region starting at the same address.
    pub fn insert(&mut self, base: u32, bytes: Vec<u8>) {
        let _ = self.regions.insert(base, bytes);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_region(mut self, base: u32, bytes: Vec<u8>) -> Self {
        self.insert(base, bytes);
        self
    }

    /// Regions in ascending address order.
    pub fn regions(&self) -> impl Iterator<Item = (u32, &[u8])> {
        self.regions.iter().map(|(base, bytes)| (*base, bytes.as_slice()))
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the image has no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl FromIterator<(u32, Vec<u8>)> for FirmwareImage {
    fn from_iter<I: IntoIterator<Item = (u32, Vec<u8>)>>(iter: I) -> Self {
        Self {
            regions: iter.into_iter().collect(),
        }
    }
}

/// Everything the decoder derives from an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Decoded instructions keyed by byte address.
    pub instructions: InstructionTable,
    /// Raw image bytes, for display.
    pub program_memory: Vec<u8>,
    /// Initialized data, copied to data memory at `0x100` by the core.
    pub data_section: Vec<u8>,
    /// Non-fatal events encountered while decoding.
    pub issues: Vec<DecodeIssue>,
}

/// Allocates `len` copies of `fill`, reporting failure instead of aborting.
pub(crate) fn allocate<T: Clone>(space: &'static str, len: usize, fill: T) -> Result<Vec<T>, SimError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| SimError::Allocation {
        space,
        size: len.saturating_mul(mem::size_of::<T>()),
    })?;
    buf.resize(len, fill);
    Ok(buf)
}

/// Decodes `image` against the built-in AVR catalog.
///
/// # Errors
///
/// Returns an error if the device prototype is invalid or a memory space
/// cannot be allocated.
pub fn decode(device: &DevicePrototype, image: &FirmwareImage) -> Result<DecodedImage, SimError> {
    decode_with(Catalog::avr(), device, image)
}

/// Decodes `image` against a caller-supplied catalog.
///
/// # Arguments
///
/// * `catalog` - Patterns searched in order for every word.
/// * `device` - Sizes of program memory and the data section.
/// * `image` - Chunks to decode.
///
/// # Errors
///
/// Returns an error if the device prototype is invalid or a memory space
/// cannot be allocated.
pub fn decode_with(catalog: &Catalog, device: &DevicePrototype, image: &FirmwareImage) -> Result<DecodedImage, SimError> {
    device.validate()?;

    let flash = device.program_memory_size as usize;
    let mut program_memory = allocate("program memory", flash, 0u8)?;
    let mut data_section = allocate("data section", device.sram_size as usize, 0u8)?;
    let mut instructions = InstructionTable::with_slots(allocate("instruction table", flash, None)?);
    let mut issues = Vec::new();

    for (base, bytes) in image.regions() {
        copy_region(&mut program_memory, base as usize, bytes, &mut issues);
        decode_chunk(catalog, base, bytes, &mut instructions, &mut data_section, &mut issues);
    }

    debug!(
        device = %device.name,
        regions = image.len(),
        instructions = instructions.count(),
        data_bytes = data_section.iter().filter(|b| **b != 0).count(),
        issues = issues.len(),
        "image decoded"
    );

    Ok(DecodedImage {
        instructions,
        program_memory,
        data_section,
        issues,
    })
}

/// Whether `inst` is the `rjmp .-2` that ends the code of a chunk.
fn is_sentinel(inst: &DecodedInstruction) -> bool {
    inst.prototype.mnemonic == Mnemonic::Rjmp && inst.operand1 == SENTINEL_OFFSET
}

fn decode_chunk(
    catalog: &Catalog,
    base: u32,
    bytes: &[u8],
    table: &mut InstructionTable,
    data_section: &mut [u8],
    issues: &mut Vec<DecodeIssue>,
) {
    let mut offset = 0usize;

    while offset + 1 < bytes.len() {
        let addr = base.wrapping_add(offset as u32);
        let word = u16::from_le_bytes([bytes[offset], bytes[offset + 1]]);

        let Some(proto) = catalog.lookup(word) else {
            warn!(addr = format_args!("{addr:#06x}"), word = format_args!("{word:#06x}"), "unknown opcode skipped");
            issues.push(DecodeIssue::UnknownOpcode { addr, word });
            offset += 2;
            continue;
        };

        let next_word = if proto.word_count == 2 {
            if let Some(&[lo, hi]) = bytes.get(offset + 2..offset + 4) {
                u16::from_le_bytes([lo, hi])
            } else {
                warn!(addr = format_args!("{addr:#06x}"), mnemonic = proto.mnemonic.name(), "two-word instruction cut off");
                issues.push(DecodeIssue::Truncated { addr, word });
                return;
            }
        } else {
            0
        };

        let inst = DecodedInstruction::new(*proto, word, next_word, addr);
        table.insert(addr, inst);
        offset += proto.byte_len() as usize;

        if is_sentinel(&inst) {
            debug!(addr = format_args!("{addr:#06x}"), data_bytes = bytes.len() - offset, "end of code");
            copy_region(data_section, base as usize + offset, &bytes[offset..], issues);
            return;
        }
    }
}

/// Copies `src` into `dst` at `start`, reporting whatever does not fit.
fn copy_region(dst: &mut [u8], start: usize, src: &[u8], issues: &mut Vec<DecodeIssue>) {
    let fits = dst.len().saturating_sub(start).min(src.len());
    if fits > 0 {
        dst[start..start + fits].copy_from_slice(&src[..fits]);
    }
    if fits < src.len() {
        let addr = (start + fits) as u32;
        let len = src.len() - fits;
        warn!(addr = format_args!("{addr:#06x}"), len, "bytes outside memory dropped");
        issues.push(DecodeIssue::OutOfRange { addr, len });
    }
}
