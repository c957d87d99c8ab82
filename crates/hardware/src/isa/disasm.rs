//! Instruction Disassembler for the AVR catalog.
//!
//! Renders decoded instructions as one line each, for the load-time listing,
//! the CLI, and test diagnostics. Operands are shown as resolved by the
//! decoder:
//!
//! - register, I/O, immediate and address operands in hex (`0x%02x`),
//! - relative targets as a signed byte offset (`.+4`, `.-2`),
//! - pointer operands in assembler form (`X`, `Y+`, `-Z`),
//! - displacements as `Y+0x..` / `Z+0x..`.
//!
//! # Usage
//!
//! ```
//! use avrsim_core::isa::catalog::Catalog;
//! use avrsim_core::isa::disasm::format_instruction;
//! use avrsim_core::isa::instruction::DecodedInstruction;
//!
//! let proto = *Catalog::avr().lookup(0xCFFF).unwrap();
//! let inst = DecodedInstruction::new(proto, 0xCFFF, 0, 0x0a);
//! assert_eq!(format_instruction(0x0a, &inst), "0x000a: rjmp    .-2");
//! ```

use super::instruction::{DecodedInstruction, InstructionTable};
use super::operands::OperandKind;

/// Width the mnemonic column is padded to.
const MNEMONIC_WIDTH: usize = 8;

/// Text for one resolved operand, or `None` for an absent operand.
fn operand_text(kind: OperandKind, value: i32) -> Option<String> {
    let text = match kind {
        OperandKind::None => return None,
        OperandKind::Rel7 | OperandKind::Rel12 => format!(".{value:+}"),
        OperandKind::PtrX => "X".to_string(),
        OperandKind::PtrXInc => "X+".to_string(),
        OperandKind::PtrXDec => "-X".to_string(),
        OperandKind::PtrYInc => "Y+".to_string(),
        OperandKind::PtrYDec => "-Y".to_string(),
        OperandKind::PtrZ => "Z".to_string(),
        OperandKind::PtrZInc => "Z+".to_string(),
        OperandKind::PtrZDec => "-Z".to_string(),
        OperandKind::DispY => format!("Y+0x{value:02x}"),
        OperandKind::DispZ => format!("Z+0x{value:02x}"),
        _ => format!("0x{value:02x}"),
    };
    Some(text)
}

/// Formats one decoded instruction located at byte address `addr`.
///
/// # Returns
///
/// A line of the form `0x%04x: <mnemonic padded to 8><operands>`. Operands
/// are separated by `", "`; instructions without operands carry no padding.
pub fn format_instruction(addr: u32, inst: &DecodedInstruction) -> String {
    let proto = &inst.prototype;
    let name = proto.mnemonic.name();
    let operands: Vec<String> = [
        operand_text(proto.operand1, inst.operand1),
        operand_text(proto.operand2, inst.operand2),
    ]
    .into_iter()
    .flatten()
    .collect();

    if operands.is_empty() {
        format!("0x{addr:04x}: {name}")
    } else {
        format!("0x{addr:04x}: {name:<MNEMONIC_WIDTH$}{}", operands.join(", "))
    }
}

/// Formats every instruction of `table` in address order.
pub fn listing(table: &InstructionTable) -> Vec<String> {
    table
        .iter()
        .map(|(addr, inst)| format_instruction(addr, inst))
        .collect()
}
