//! # Register Pair Tests
//!
//! X, Y, Z and the stack pointer are views over two bytes of data memory.
//! Writes through either side must be visible through the other.

use avrsim_core::common::RegPair;
use avrsim_core::common::constants::{X_REGISTER, Y_REGISTER, Z_REGISTER};
use proptest::prelude::*;

use crate::common::builder::ProgramBuilder;
use crate::common::harness::TestContext;

#[test]
fn test_pair_addresses() {
    assert_eq!(RegPair::X.addr(), X_REGISTER);
    assert_eq!(RegPair::Y.addr(), Y_REGISTER);
    assert_eq!(RegPair::Z.addr(), Z_REGISTER);
}

#[test]
fn test_byte_writes_visible_through_view() {
    let mut mem = [0u8; 0x20];
    mem[0x1C] = 0x34;
    mem[0x1D] = 0x12;
    assert_eq!(RegPair::Y.get(&mem), 0x1234);
}

#[test]
fn test_view_writes_visible_as_bytes() {
    let mut mem = [0u8; 0x20];
    RegPair::Z.view(&mut mem).set(0xBEEF);
    assert_eq!(mem[0x1E], 0xEF);
    assert_eq!(mem[0x1F], 0xBE);
}

#[test]
fn test_ldi_into_r28_r29_sets_y() {
    let mut ctx = TestContext::new(ProgramBuilder::new().ldi(28, 0x00).ldi(29, 0x08).halt());
    ctx.run(2);
    assert_eq!(ctx.y(), 0x0800);
}

#[test]
fn test_stack_pointer_starts_past_end_of_data() {
    let ctx = TestContext::new(ProgramBuilder::new().halt());
    assert_eq!(usize::from(ctx.mcu.sp()), ctx.mcu.data().len());
    assert_eq!(ctx.mem(0x5D), 0x00);
    assert_eq!(ctx.mem(0x5E), 0x09);
}

proptest! {
    #[test]
    fn prop_bytes_and_view_agree(lo: u8, hi: u8, delta: i16) {
        let mut mem = [0u8; 0x20];
        mem[0x1A] = lo;
        mem[0x1B] = hi;
        let expected = u16::from_le_bytes([lo, hi]);
        prop_assert_eq!(RegPair::X.get(&mem), expected);

        let mut x = RegPair::X.view(&mut mem);
        x.add_signed(i32::from(delta));
        let updated = expected.wrapping_add(delta as u16);
        prop_assert_eq!(x.get(), updated);
        prop_assert_eq!(mem[0x1A..0x1C].to_vec(), updated.to_le_bytes().to_vec());
    }

    #[test]
    fn prop_set_then_bytes(val: u16) {
        let mut mem = [0u8; 0x20];
        RegPair::Y.set(&mut mem, val);
        prop_assert_eq!(mem[0x1C], val as u8);
        prop_assert_eq!(mem[0x1D], (val >> 8) as u8);
        prop_assert_eq!(mem.iter().filter(|b| **b != 0).count(), usize::from(val as u8 != 0) + usize::from(val >> 8 != 0));
    }
}
