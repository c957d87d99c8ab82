//! # Catalog Lookup Tests
//!
//! Lookup returns the first entry, in catalog order, whose masked bits equal
//! its opcode. These tests pin down the order-sensitive cases.

use avrsim_core::isa::catalog::{Catalog, InstructionPrototype, Mnemonic};
use avrsim_core::isa::operands::OperandKind;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn mnemonic(word: u16) -> Option<Mnemonic> {
    Catalog::avr().lookup(word).map(|p| p.mnemonic)
}

#[rstest]
#[case(0x0000, Mnemonic::Nop)]
#[case(0x2411, Mnemonic::Eor)] // eor r1, r1
#[case(0x0C01, Mnemonic::Add)] // add r0, r1
#[case(0x01FE, Mnemonic::Movw)] // movw r30, r28
#[case(0xE50A, Mnemonic::Ldi)] // ldi r16, 0x5A
#[case(0xEF0F, Mnemonic::Ser)] // ser r16
#[case(0x8108, Mnemonic::LddY)] // ldd r16, Y+0
#[case(0x8100, Mnemonic::LddZ)] // ldd r16, Z+0
#[case(0x8309, Mnemonic::StdY)] // std Y+1, r16
#[case(0x8301, Mnemonic::StdZ)] // std Z+1, r16
#[case(0x910F, Mnemonic::Pop)] // pop r16
#[case(0x930F, Mnemonic::Push)] // push r16
#[case(0x9601, Mnemonic::Adiw)] // adiw r24, 1
#[case(0xB60F, Mnemonic::In)] // in r0, 0x3f
#[case(0xBE0F, Mnemonic::Out)] // out 0x3f, r0
#[case(0x940C, Mnemonic::Jmp)]
#[case(0x940E, Mnemonic::Call)]
#[case(0xC000, Mnemonic::Rjmp)]
#[case(0xD000, Mnemonic::Rcall)]
#[case(0x9508, Mnemonic::Ret)]
#[case(0x9478, Mnemonic::Bset)] // sei
#[case(0x94F8, Mnemonic::Bclr)] // cli
#[case(0x95C8, Mnemonic::Lpm)]
#[case(0x9005, Mnemonic::Lpm)] // lpm r0, Z+
#[case(0x91ED, Mnemonic::Ld)] // ld r30, X+
#[case(0x9361, Mnemonic::St)] // st Z+, r22
#[case(0xF409, Mnemonic::Brbc)] // brne .+2
#[case(0xFE07, Mnemonic::Sbrs)]
fn test_lookup_known_words(#[case] word: u16, #[case] expected: Mnemonic) {
    assert_eq!(mnemonic(word), Some(expected));
}

#[rstest]
#[case(0xFFFF)]
#[case(0x0001)]
#[case(0xFF08)]
fn test_lookup_unknown_words(#[case] word: u16) {
    assert_eq!(mnemonic(word), None);
}

#[test]
fn test_ser_shadows_ldi_0xff() {
    // ldi r16, 0xFF and ser r16 are the same word.
    assert_eq!(mnemonic(0xEF0F), Some(Mnemonic::Ser));
    // One bit of K off: plain ldi.
    assert_eq!(mnemonic(0xEF0E), Some(Mnemonic::Ldi));
    assert_eq!(mnemonic(0xEE0F), Some(Mnemonic::Ldi));
}

#[test]
fn test_sentinel_word_is_rjmp_back_onto_itself() {
    let proto = Catalog::avr().lookup(0xCFFF).expect("rjmp");
    assert_eq!(proto.mnemonic, Mnemonic::Rjmp);
    assert_eq!(proto.operand1.resolve(0xCFFF, 0, 0x40), -2);
}

#[test]
fn test_two_word_instructions() {
    for word in [0x9000u16, 0x9200, 0x940C, 0x940E] {
        assert_eq!(Catalog::avr().lookup(word).map(|p| p.word_count), Some(2), "{word:#06x}");
    }
}

#[test]
fn test_custom_catalog_first_match_wins() {
    let specific = InstructionPrototype::new(1, Mnemonic::Nop, 0x1234, 0xFFFF, 1, OperandKind::None, OperandKind::None);
    let general = InstructionPrototype::new(2, Mnemonic::Cpse, 0x1000, 0xF000, 1, OperandKind::Reg5D, OperandKind::Reg5R);

    let ordered = Catalog::new(vec![specific, general]);
    assert_eq!(ordered.lookup(0x1234).map(|p| p.id), Some(1));
    assert_eq!(ordered.lookup(0x1235).map(|p| p.id), Some(2));

    let shadowed = Catalog::new(vec![general, specific]);
    assert_eq!(shadowed.lookup(0x1234).map(|p| p.id), Some(2));
    assert_eq!(shadowed.len(), 2);
}

#[test]
fn test_empty_catalog_matches_nothing() {
    let empty = Catalog::new(Vec::new());
    assert!(empty.is_empty());
    assert!(empty.lookup(0x0000).is_none());
}

#[test]
fn test_built_in_ids_are_stable_and_unique() {
    let entries = Catalog::avr().entries();
    for (i, p) in entries.iter().enumerate() {
        assert_eq!(p.id as usize, i + 1, "{}", p.mnemonic.name());
    }
}
