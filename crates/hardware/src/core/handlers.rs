//! Instruction Handlers.
//!
//! A handler receives the two resolved operands of its instruction and
//! returns the cycle cost. By the time it runs the program counter already
//! points past the instruction, so relative targets add to it directly and
//! call instructions push it as the return address.
//!
//! Only a subset of the catalog executes; [`handler_for`] returns `None` for
//! the rest and the core skips them with a warning. Adding an instruction
//! means writing its function here and binding it in [`handler_for`].

use crate::common::RegPair;
use crate::common::constants::SREG_V;
use crate::isa::catalog::Mnemonic;

use super::Mcu;

/// Execution routine: `(core, operand1, operand2) -> cycle cost`.
pub type Handler = fn(&mut Mcu, i32, i32) -> u8;

/// Returns the handler for `mnemonic`, or `None` if it only decodes.
pub fn handler_for(mnemonic: Mnemonic) -> Option<Handler> {
    let handler: Handler = match mnemonic {
        Mnemonic::Nop => nop,
        Mnemonic::Adiw => adiw,
        Mnemonic::Bclr => bclr,
        Mnemonic::Bset => bset,
        Mnemonic::Call => call,
        Mnemonic::Eor => eor,
        Mnemonic::Jmp => jmp,
        Mnemonic::LddY => ldd_y,
        Mnemonic::LddZ => ldd_z,
        Mnemonic::StdY => std_y,
        Mnemonic::StdZ => std_z,
        Mnemonic::Ldi => ldi,
        Mnemonic::Ser => ser,
        Mnemonic::In | Mnemonic::Out | Mnemonic::Mov => transfer,
        Mnemonic::Movw => movw,
        Mnemonic::Push => push,
        Mnemonic::Pop => pop,
        Mnemonic::Rcall => rcall,
        Mnemonic::Rjmp => rjmp,
        Mnemonic::Ret => ret,
        _ => return None,
    };
    Some(handler)
}

/// Data-space address carried by a register, I/O, or address operand.
///
/// Resolvers only produce non-negative values for these kinds.
#[inline]
const fn addr(op: i32) -> usize {
    op as usize
}

#[inline]
fn reg(mcu: &Mcu, op: i32) -> u8 {
    mcu.read_data(addr(op))
}

/// Extra cycle taken by calls and returns on wide-address devices.
#[inline]
fn wide_penalty(mcu: &Mcu) -> u8 {
    u8::from(mcu.device().is_wide_address)
}

const fn nop(_mcu: &mut Mcu, _: i32, _: i32) -> u8 {
    1
}

fn adiw(mcu: &mut Mcu, pair: i32, imm: i32) -> u8 {
    let mut view = mcu.pair_mut(RegPair::at(pair as u16));
    view += imm as u16;
    2
}

fn bclr(mcu: &mut Mcu, bit: i32, _: i32) -> u8 {
    mcu.set_flag(1 << bit, false);
    1
}

fn bset(mcu: &mut Mcu, bit: i32, _: i32) -> u8 {
    mcu.set_flag(1 << bit, true);
    1
}

fn call(mcu: &mut Mcu, target: i32, _: i32) -> u8 {
    mcu.push_return_address();
    mcu.set_pc(target as u32);
    4 + wide_penalty(mcu)
}

fn rcall(mcu: &mut Mcu, offset: i32, _: i32) -> u8 {
    mcu.push_return_address();
    let pc = mcu.pc().wrapping_add_signed(offset);
    mcu.set_pc(pc);
    3 + wide_penalty(mcu)
}

fn ret(mcu: &mut Mcu, _: i32, _: i32) -> u8 {
    mcu.pop_return_address();
    4 + wide_penalty(mcu)
}

fn jmp(mcu: &mut Mcu, target: i32, _: i32) -> u8 {
    mcu.set_pc(target as u32);
    3
}

fn rjmp(mcu: &mut Mcu, offset: i32, _: i32) -> u8 {
    let pc = mcu.pc().wrapping_add_signed(offset);
    mcu.set_pc(pc);
    2
}

fn eor(mcu: &mut Mcu, rd: i32, rr: i32) -> u8 {
    let result = reg(mcu, rd) ^ reg(mcu, rr);
    mcu.write_data(addr(rd), result);
    mcu.set_flag(SREG_V, false);
    mcu.check_zns(result);
    1
}

fn load_indexed(mcu: &mut Mcu, index: RegPair, rd: i32, q: i32) -> u8 {
    let src = usize::from(mcu.pair(index)) + addr(q);
    let val = mcu.read_data(src);
    mcu.write_data(addr(rd), val);
    2
}

fn store_indexed(mcu: &mut Mcu, index: RegPair, q: i32, rr: i32) -> u8 {
    let dst = usize::from(mcu.pair(index)) + addr(q);
    let val = reg(mcu, rr);
    mcu.write_data(dst, val);
    2
}

fn ldd_y(mcu: &mut Mcu, rd: i32, q: i32) -> u8 {
    load_indexed(mcu, RegPair::Y, rd, q)
}

fn ldd_z(mcu: &mut Mcu, rd: i32, q: i32) -> u8 {
    load_indexed(mcu, RegPair::Z, rd, q)
}

fn std_y(mcu: &mut Mcu, q: i32, rr: i32) -> u8 {
    store_indexed(mcu, RegPair::Y, q, rr)
}

fn std_z(mcu: &mut Mcu, q: i32, rr: i32) -> u8 {
    store_indexed(mcu, RegPair::Z, q, rr)
}

fn ldi(mcu: &mut Mcu, rd: i32, imm: i32) -> u8 {
    mcu.write_data(addr(rd), imm as u8);
    1
}

fn ser(mcu: &mut Mcu, rd: i32, _: i32) -> u8 {
    mcu.write_data(addr(rd), 0xFF);
    1
}

/// `in`, `out`, and `mov`: `mem[op1] = mem[op2]`.
fn transfer(mcu: &mut Mcu, dst: i32, src: i32) -> u8 {
    let val = reg(mcu, src);
    mcu.write_data(addr(dst), val);
    1
}

fn movw(mcu: &mut Mcu, rd: i32, rr: i32) -> u8 {
    let val = mcu.pair(RegPair::at(rr as u16));
    RegPair::at(rd as u16).set(mcu.data_mut(), val);
    1
}

fn push(mcu: &mut Mcu, rr: i32, _: i32) -> u8 {
    let val = reg(mcu, rr);
    mcu.push_byte(val);
    2
}

fn pop(mcu: &mut Mcu, rd: i32, _: i32) -> u8 {
    let val = mcu.pop_byte();
    mcu.write_data(addr(rd), val);
    2
}
