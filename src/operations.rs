//! One function per Chip-8 operation.
//!
//! The program counter has already been moved past the current instruction
//! when these run. Whenever VF is both an operand and the flag, the operands
//! are read first and the flag is written last.

use rand::Rng;

use crate::config::Quirks;
use crate::constants::{FONT_GLYPH_HEIGHT, FONT_START};
use crate::error::RuntimeError;
use crate::state::State;

/// Largest 12-bit address
const ADDRESS_MASK: u16 = 0x0FFF;

fn skip_if(state: &mut State, condition: bool) {
    if condition {
        state.pc = state.pc.wrapping_add(0x2);
    }
}

/// clear
pub fn cls(state: &mut State) {
    state.frame_buffer.clear();
}

/// PC = STACK.pop()
pub fn ret(state: &mut State) -> Result<(), RuntimeError> {
    state.pc = state.stack.pop()?;
    Ok(())
}

/// PC = addr
pub fn jp(state: &mut State, addr: u16) {
    state.pc = addr;
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, addr: u16) -> Result<(), RuntimeError> {
    state.stack.push(state.pc)?;
    state.pc = addr;
    Ok(())
}

/// if Vx == nn then pc += 2
pub fn se_byte(state: &mut State, x: u8, nn: u8) {
    let condition = state.v[x as usize] == nn;
    skip_if(state, condition);
}

/// if Vx != nn then pc += 2
pub fn sne_byte(state: &mut State, x: u8, nn: u8) {
    let condition = state.v[x as usize] != nn;
    skip_if(state, condition);
}

/// if Vx == Vy then pc += 2
pub fn se_reg(state: &mut State, x: u8, y: u8) {
    let condition = state.v[x as usize] == state.v[y as usize];
    skip_if(state, condition);
}

/// if Vx != Vy then pc += 2
pub fn sne_reg(state: &mut State, x: u8, y: u8) {
    let condition = state.v[x as usize] != state.v[y as usize];
    skip_if(state, condition);
}

/// Vx = nn
pub fn ld_byte(state: &mut State, x: u8, nn: u8) {
    state.v[x as usize] = nn;
}

/// Vx += nn
/// Overflow is dropped and VF is left alone
pub fn add_byte(state: &mut State, x: u8, nn: u8) {
    state.v[x as usize] = state.v[x as usize].wrapping_add(nn);
}

/// Vx = Vy
pub fn ld_reg(state: &mut State, x: u8, y: u8) {
    state.v[x as usize] = state.v[y as usize];
}

/// Vx |= Vy
pub fn or(state: &mut State, x: u8, y: u8) {
    state.v[x as usize] |= state.v[y as usize];
}

/// Vx &= Vy
pub fn and(state: &mut State, x: u8, y: u8) {
    state.v[x as usize] &= state.v[y as usize];
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: u8, y: u8) {
    state.v[x as usize] ^= state.v[y as usize];
}

/// Vx += Vy; VF = overflow
pub fn add_reg(state: &mut State, x: u8, y: u8) {
    let (res, over) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    state.v[x as usize] = res;
    state.set_flag(over);
}

/// Vx -= Vy; VF = !underflow
pub fn sub(state: &mut State, x: u8, y: u8) {
    let (res, under) = state.v[x as usize].overflowing_sub(state.v[y as usize]);
    state.v[x as usize] = res;
    state.set_flag(!under);
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(state: &mut State, x: u8, y: u8) {
    let (res, under) = state.v[y as usize].overflowing_sub(state.v[x as usize]);
    state.v[x as usize] = res;
    state.set_flag(!under);
}

fn shift_source(state: &State, quirks: &Quirks, x: u8, y: u8) -> u8 {
    if quirks.shift_uses_vy {
        state.v[y as usize]
    } else {
        state.v[x as usize]
    }
}

/// Vx = src >> 1; VF = shifted out bit
/// src is Vy with `shift_uses_vy`, otherwise Vx
pub fn shr(state: &mut State, quirks: &Quirks, x: u8, y: u8) {
    let source = shift_source(state, quirks, x, y);
    state.v[x as usize] = source >> 1;
    state.set_flag(source & 0x1 == 0x1);
}

/// Vx = src << 1; VF = shifted out bit
/// src is Vy with `shift_uses_vy`, otherwise Vx
pub fn shl(state: &mut State, quirks: &Quirks, x: u8, y: u8) {
    let source = shift_source(state, quirks, x, y);
    state.v[x as usize] = source << 1;
    state.set_flag(source >> 7 == 0x1);
}

/// I = addr
pub fn ld_i(state: &mut State, addr: u16) {
    state.i = addr;
}

/// PC = V0 + addr
pub fn jp_v0(state: &mut State, addr: u16) {
    state.pc = addr + u16::from(state.v[0x0]);
}

/// Vx = rand_byte & nn
pub fn rnd(state: &mut State, rng: &mut impl Rng, x: u8, nn: u8) {
    let rand_byte: u8 = rng.gen();
    state.v[x as usize] = rand_byte & nn;
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position Vx, Vy on the FrameBuffer with wrapping.
/// VF is set if any pixels were erased
pub fn drw(state: &mut State, x: u8, y: u8, n: u8) -> Result<(), RuntimeError> {
    let mut sprite = [0; 15];
    let sprite = &mut sprite[..n as usize];
    for (row, byte) in sprite.iter_mut().enumerate() {
        *byte = state.memory.read(state.i, row)?;
    }
    let px = usize::from(state.v[x as usize]);
    let py = usize::from(state.v[y as usize]);
    let collision = state.frame_buffer.draw_sprite(px, py, sprite);
    state.set_flag(collision);
    Ok(())
}

/// if key[Vx] is down then pc += 2
pub fn skp(state: &mut State, x: u8) {
    let condition = state.keypad.is_down(state.v[x as usize]);
    skip_if(state, condition);
}

/// if key[Vx] is up then pc += 2
pub fn sknp(state: &mut State, x: u8) {
    let condition = !state.keypad.is_down(state.v[x as usize]);
    skip_if(state, condition);
}

/// Vx = DT
pub fn ld_vx_dt(state: &mut State, x: u8) {
    state.v[x as usize] = state.timers.delay;
}

/// DT = Vx
pub fn ld_dt_vx(state: &mut State, x: u8) {
    state.timers.delay = state.v[x as usize];
}

/// ST = Vx
/// Returns the new sound state if it flipped
pub fn ld_st_vx(state: &mut State, x: u8) -> Option<bool> {
    let value = state.v[x as usize];
    state.timers.set_sound(value)
}

/// I += Vx
/// VF = I left the 12-bit address space, with `add_i_sets_vf`
pub fn add_i(state: &mut State, quirks: &Quirks, x: u8) {
    state.i = state.i.wrapping_add(u16::from(state.v[x as usize]));
    if quirks.add_i_sets_vf {
        state.set_flag(state.i > ADDRESS_MASK);
    }
}

/// I = font base + Vx * 5
pub fn ld_f(state: &mut State, x: u8) {
    let digit = u16::from(state.v[x as usize]);
    state.i = FONT_START + digit * FONT_GLYPH_HEIGHT;
}

/// mem[I..I+3] = bcd(Vx)
pub fn ld_b(state: &mut State, x: u8) -> Result<(), RuntimeError> {
    let value = state.v[x as usize];
    let bcd = [value / 100, value / 10 % 10, value % 10];
    for (offset, digit) in bcd.iter().enumerate() {
        state.memory.write(state.i, offset, *digit)?;
    }
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx
/// I = I + x + 1 with `load_store_increments_i`
pub fn ld_i_vx(state: &mut State, quirks: &Quirks, x: u8) -> Result<(), RuntimeError> {
    for reg in 0..=x as usize {
        state.memory.write(state.i, reg, state.v[reg])?;
    }
    advance_i(state, quirks, x);
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]
/// I = I + x + 1 with `load_store_increments_i`
pub fn ld_vx_i(state: &mut State, quirks: &Quirks, x: u8) -> Result<(), RuntimeError> {
    for reg in 0..=x as usize {
        state.v[reg] = state.memory.read(state.i, reg)?;
    }
    advance_i(state, quirks, x);
    Ok(())
}

fn advance_i(state: &mut State, quirks: &Quirks, x: u8) {
    if quirks.load_store_increments_i {
        state.i = state.i.wrapping_add(u16::from(x) + 1);
    }
}
