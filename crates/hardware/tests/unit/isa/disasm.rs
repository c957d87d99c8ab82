//! # Disassembler Format Tests
//!
//! One line per instruction: address, mnemonic padded to eight columns,
//! then the resolved operands.

use avrsim_core::device;
use avrsim_core::isa::catalog::Catalog;
use avrsim_core::isa::disasm::{format_instruction, listing};
use avrsim_core::isa::instruction::DecodedInstruction;
use avrsim_core::sim::decode;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::ProgramBuilder;

fn line(addr: u32, word: u16, next: u16) -> String {
    let proto = *Catalog::avr().lookup(word).expect("known word");
    format_instruction(addr, &DecodedInstruction::new(proto, word, next, addr))
}

#[rstest]
#[case(0x0000, 0x0000, 0, "0x0000: nop")]
#[case(0x0002, 0xE50A, 0, "0x0002: ldi     0x10, 0x5a")]
#[case(0x0010, 0x2411, 0, "0x0010: eor     0x01, 0x01")]
#[case(0x0004, 0xCFFF, 0, "0x0004: rjmp    .-2")]
#[case(0x0004, 0xC002, 0, "0x0004: rjmp    .+4")]
#[case(0x0006, 0xDFFD, 0, "0x0006: rcall   .-6")]
#[case(0x0000, 0x940C, 0x0034, "0x0000: jmp     0x68")]
#[case(0x0020, 0xBE0F, 0, "0x0020: out     0x5f, 0x00")]
#[case(0x0020, 0xB60F, 0, "0x0020: in      0x00, 0x5f")]
#[case(0x0030, 0x91ED, 0, "0x0030: ld      0x1e, X+")]
#[case(0x0030, 0x9362, 0, "0x0030: st      -Z, 0x16")]
#[case(0x0040, 0x8309, 0, "0x0040: std     Y+0x01, 0x10")]
#[case(0x0040, 0xA10A, 0, "0x0040: ldd     0x10, Y+0x22")]
#[case(0x0050, 0xF409, 0, "0x0050: brbc    0x01, .+2")]
#[case(0x0060, 0x9508, 0, "0x0060: ret")]
fn test_format(#[case] addr: u32, #[case] word: u16, #[case] next: u16, #[case] expected: &str) {
    assert_eq!(line(addr, word, next), expected);
}

#[test]
fn test_listing_skips_data_and_second_words() {
    let image = ProgramBuilder::new()
        .jmp(0x0003)
        .ldi(16, 0x01)
        .halt()
        .bytes(&[0xFF, 0xFF])
        .image();
    let decoded = decode(&device::lookup("atmega8").expect("device"), &image).expect("decode");

    assert_eq!(
        listing(&decoded.instructions),
        vec![
            "0x0000: jmp     0x06".to_string(),
            "0x0004: ldi     0x10, 0x01".to_string(),
            "0x0006: rjmp    .-2".to_string(),
        ]
    );
}

#[test]
fn test_debug_omits_handler() {
    let proto = *Catalog::avr().lookup(0xE50A).expect("ldi");
    let text = format!("{:?}", DecodedInstruction::new(proto, 0xE50A, 0, 0));
    assert!(text.contains("mnemonic: Ldi"), "{text}");
    assert!(text.contains("operand1: 16"), "{text}");
    assert!(text.ends_with(", .. }"), "{text}");
}
