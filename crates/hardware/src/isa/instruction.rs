//! Decoded instruction records.
//!
//! The decoder turns every recognized word into a [`DecodedInstruction`] and
//! stores it in an [`InstructionTable`] slot keyed by the byte address of its
//! first word. Slots covered by the second word of a two-word instruction, and
//! slots holding unknown words or data, stay empty.

use std::fmt;

use crate::core::handlers::{Handler, handler_for};

use super::catalog::InstructionPrototype;

/// An instruction with its operands resolved and its handler bound.
#[derive(Clone, Copy)]
pub struct DecodedInstruction {
    /// Resolved first operand.
    pub operand1: i32,
    /// Resolved second operand.
    pub operand2: i32,
    /// The catalog entry the word matched.
    pub prototype: InstructionPrototype,
    /// Execution routine, or `None` when the instruction only decodes.
    pub handler: Option<Handler>,
}

impl DecodedInstruction {
    /// Resolves both operands of `prototype` and binds its handler.
    ///
    /// # Arguments
    ///
    /// * `prototype` - The matching catalog entry.
    /// * `word` - First instruction word.
    /// * `next_word` - Second word for two-word instructions, otherwise 0.
    /// * `addr` - Byte address of the first word.
    pub fn new(prototype: InstructionPrototype, word: u16, next_word: u16, addr: u32) -> Self {
        Self {
            operand1: prototype.operand1.resolve(word, next_word, addr),
            operand2: prototype.operand2.resolve(word, next_word, addr),
            prototype,
            handler: handler_for(prototype.mnemonic),
        }
    }

    /// Whether the execution core can run this instruction.
    pub const fn is_implemented(&self) -> bool {
        self.handler.is_some()
    }

    /// Length in bytes.
    pub const fn byte_len(&self) -> u32 {
        self.prototype.byte_len()
    }

    fn handler_addr(&self) -> Option<usize> {
        self.handler.map(|h| h as usize)
    }
}

impl PartialEq for DecodedInstruction {
    fn eq(&self, other: &Self) -> bool {
        self.operand1 == other.operand1
            && self.operand2 == other.operand2
            && self.prototype == other.prototype
            && self.handler_addr() == other.handler_addr()
    }
}

impl Eq for DecodedInstruction {}

impl fmt::Debug for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedInstruction")
            .field("mnemonic", &self.prototype.mnemonic)
            .field("id", &self.prototype.id)
            .field("operand1", &self.operand1)
            .field("operand2", &self.operand2)
            .field("implemented", &self.is_implemented())
            .finish_non_exhaustive()
    }
}

/// Sparse table of decoded instructions indexed by byte address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstructionTable {
    slots: Vec<Option<DecodedInstruction>>,
}

impl InstructionTable {
    /// Wraps pre-allocated slots, one per program memory byte.
    pub(crate) const fn with_slots(slots: Vec<Option<DecodedInstruction>>) -> Self {
        Self { slots }
    }

    /// Instruction starting at byte address `addr`, if any.
    #[inline]
    pub fn get(&self, addr: u32) -> Option<&DecodedInstruction> {
        self.slots.get(addr as usize).and_then(Option::as_ref)
    }

    /// Stores `inst` at `addr`. Addresses past the end are ignored.
    pub(crate) fn insert(&mut self, addr: u32, inst: DecodedInstruction) {
        if let Some(slot) = self.slots.get_mut(addr as usize) {
            *slot = Some(inst);
        }
    }

    /// Occupied slots in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &DecodedInstruction)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(addr, slot)| slot.as_ref().map(|inst| (addr as u32, inst)))
    }

    /// Number of slots (equal to the program memory size).
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no slots at all.
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of decoded instructions.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
