//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the AVR instruction catalog, operand encodings, decoded
//! instruction records, and the disassembler.
//!
//! # Layout
//!
//! * `catalog`: Ordered opcode/mask table and the `Mnemonic` enum.
//! * `operands`: Operand kinds and their resolvers.
//! * `instruction`: Decoded instructions and the sparse instruction table.
//! * `disasm`: Human-readable listing.

/// Ordered instruction-pattern table.
pub mod catalog;

/// Instruction disassembler for listings and diagnostics.
pub mod disasm;

/// Decoded instruction records and the instruction table.
pub mod instruction;

/// Operand encodings and resolvers.
pub mod operands;

pub use catalog::{Catalog, InstructionPrototype, Mnemonic};
pub use instruction::{DecodedInstruction, InstructionTable};
pub use operands::OperandKind;
