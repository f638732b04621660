use rand::Rng;

use crate::config::Quirks;
use crate::error::RuntimeError;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// # Instruction
/// A decoded opcode, one variant per operation.
///
/// Operands keep their opcode names: `x`/`y` select registers, `nn` is an
/// immediate byte, `n` an immediate nibble and `addr` a 12-bit address.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn: machine code routine on the original hardware; ignored
    Sys(u16),
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jp(u16),
    /// 2nnn
    Call(u16),
    /// 3xnn
    SeByte { x: u8, nn: u8 },
    /// 4xnn
    SneByte { x: u8, nn: u8 },
    /// 5xy0
    SeReg { x: u8, y: u8 },
    /// 6xnn
    LdByte { x: u8, nn: u8 },
    /// 7xnn
    AddByte { x: u8, nn: u8 },
    /// 8xy0
    LdReg { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    Shr { x: u8, y: u8 },
    /// 8xy7
    Subn { x: u8, y: u8 },
    /// 8xyE
    Shl { x: u8, y: u8 },
    /// 9xy0
    SneReg { x: u8, y: u8 },
    /// Annn
    LdI(u16),
    /// Bnnn
    JpV0(u16),
    /// Cxnn
    Rnd { x: u8, nn: u8 },
    /// Dxyn
    Drw { x: u8, y: u8, n: u8 },
    /// Ex9E
    Skp { x: u8 },
    /// ExA1
    Sknp { x: u8 },
    /// Fx07
    LdVxDt { x: u8 },
    /// Fx0A
    LdVxK { x: u8 },
    /// Fx15
    LdDtVx { x: u8 },
    /// Fx18
    LdStVx { x: u8 },
    /// Fx1E
    AddI { x: u8 },
    /// Fx29
    LdF { x: u8 },
    /// Fx33
    LdB { x: u8 },
    /// Fx55
    LdIVx { x: u8 },
    /// Fx65
    LdVxI { x: u8 },
    /// Anything else
    Invalid(u16),
}

/// Host visible side effects of a single step
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct StepEffects {
    /// The frame buffer changed and should be redrawn
    pub display_dirty: bool,
    /// The sound turned on (`Some(true)`) or off (`Some(false)`)
    pub sound_changed: Option<bool>,
}

/// Everything an executed instruction asks of the machine
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub effects: StepEffects,
    /// Fetching must stop until a key is pressed; the key goes in this register
    pub awaiting_key: Option<u8>,
}

/// Decodes an opcode into its Instruction.
/// Selects on the top nibble, then on n or nn for the 0, 8, E and F families.
pub fn decode(op: u16) -> Instruction {
    let (x, y, n, nn, addr) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
    match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => Instruction::Cls,
        (0x0, 0x0, 0xE, 0xE) => Instruction::Ret,
        (0x0, ..) => Instruction::Sys(addr),
        (0x1, ..) => Instruction::Jp(addr),
        (0x2, ..) => Instruction::Call(addr),
        (0x3, ..) => Instruction::SeByte { x, nn },
        (0x4, ..) => Instruction::SneByte { x, nn },
        (0x5, .., 0x0) => Instruction::SeReg { x, y },
        (0x6, ..) => Instruction::LdByte { x, nn },
        (0x7, ..) => Instruction::AddByte { x, nn },
        (0x8, .., 0x0) => Instruction::LdReg { x, y },
        (0x8, .., 0x1) => Instruction::Or { x, y },
        (0x8, .., 0x2) => Instruction::And { x, y },
        (0x8, .., 0x3) => Instruction::Xor { x, y },
        (0x8, .., 0x4) => Instruction::AddReg { x, y },
        (0x8, .., 0x5) => Instruction::Sub { x, y },
        (0x8, .., 0x6) => Instruction::Shr { x, y },
        (0x8, .., 0x7) => Instruction::Subn { x, y },
        (0x8, .., 0xE) => Instruction::Shl { x, y },
        (0x9, .., 0x0) => Instruction::SneReg { x, y },
        (0xA, ..) => Instruction::LdI(addr),
        (0xB, ..) => Instruction::JpV0(addr),
        (0xC, ..) => Instruction::Rnd { x, nn },
        (0xD, ..) => Instruction::Drw { x, y, n },
        (0xE, .., 0x9, 0xE) => Instruction::Skp { x },
        (0xE, .., 0xA, 0x1) => Instruction::Sknp { x },
        (0xF, .., 0x0, 0x7) => Instruction::LdVxDt { x },
        (0xF, .., 0x0, 0xA) => Instruction::LdVxK { x },
        (0xF, .., 0x1, 0x5) => Instruction::LdDtVx { x },
        (0xF, .., 0x1, 0x8) => Instruction::LdStVx { x },
        (0xF, .., 0x1, 0xE) => Instruction::AddI { x },
        (0xF, .., 0x2, 0x9) => Instruction::LdF { x },
        (0xF, .., 0x3, 0x3) => Instruction::LdB { x },
        (0xF, .., 0x5, 0x5) => Instruction::LdIVx { x },
        (0xF, .., 0x6, 0x5) => Instruction::LdVxI { x },
        _ => Instruction::Invalid(op),
    }
}

impl Instruction {
    /// Applies the instruction to `state`.
    /// `Sys` and `Invalid` are no-ops; reporting them is up to the caller.
    pub fn execute(
        self,
        state: &mut State,
        quirks: &Quirks,
        rng: &mut impl Rng,
    ) -> Result<Outcome, RuntimeError> {
        let mut outcome = Outcome::default();
        match self {
            Instruction::Sys(_) | Instruction::Invalid(_) => {}
            Instruction::Cls => {
                cls(state);
                outcome.effects.display_dirty = true;
            }
            Instruction::Ret => ret(state)?,
            Instruction::Jp(addr) => jp(state, addr),
            Instruction::Call(addr) => call(state, addr)?,
            Instruction::SeByte { x, nn } => se_byte(state, x, nn),
            Instruction::SneByte { x, nn } => sne_byte(state, x, nn),
            Instruction::SeReg { x, y } => se_reg(state, x, y),
            Instruction::LdByte { x, nn } => ld_byte(state, x, nn),
            Instruction::AddByte { x, nn } => add_byte(state, x, nn),
            Instruction::LdReg { x, y } => ld_reg(state, x, y),
            Instruction::Or { x, y } => or(state, x, y),
            Instruction::And { x, y } => and(state, x, y),
            Instruction::Xor { x, y } => xor(state, x, y),
            Instruction::AddReg { x, y } => add_reg(state, x, y),
            Instruction::Sub { x, y } => sub(state, x, y),
            Instruction::Shr { x, y } => shr(state, quirks, x, y),
            Instruction::Subn { x, y } => subn(state, x, y),
            Instruction::Shl { x, y } => shl(state, quirks, x, y),
            Instruction::SneReg { x, y } => sne_reg(state, x, y),
            Instruction::LdI(addr) => ld_i(state, addr),
            Instruction::JpV0(addr) => jp_v0(state, addr),
            Instruction::Rnd { x, nn } => rnd(state, rng, x, nn),
            Instruction::Drw { x, y, n } => {
                drw(state, x, y, n)?;
                outcome.effects.display_dirty = true;
            }
            Instruction::Skp { x } => skp(state, x),
            Instruction::Sknp { x } => sknp(state, x),
            Instruction::LdVxDt { x } => ld_vx_dt(state, x),
            Instruction::LdVxK { x } => outcome.awaiting_key = Some(x),
            Instruction::LdDtVx { x } => ld_dt_vx(state, x),
            Instruction::LdStVx { x } => outcome.effects.sound_changed = ld_st_vx(state, x),
            Instruction::AddI { x } => add_i(state, quirks, x),
            Instruction::LdF { x } => ld_f(state, x),
            Instruction::LdB { x } => ld_b(state, x)?,
            Instruction::LdIVx { x } => ld_i_vx(state, quirks, x)?,
            Instruction::LdVxI { x } => ld_vx_i(state, quirks, x)?,
        }
        Ok(outcome)
    }
}
