use crate::config::Quirks;
use crate::constants::PROGRAM_START;
use crate::frame_buffer::FrameBuffer;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::stack::Stack;
use crate::timers::Timers;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Stack
/// - up to 16 return addresses
///
/// Timers
/// - 2 8-bit timers (delay & sound), counted down at 60Hz
///
/// ## Memory
/// - 4096 bytes of addressable memory
/// - 64x32 frame buffer
///
/// ## Input
/// - pressed status of keys 0..F
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub stack: Stack,
    pub timers: Timers,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub keypad: Keypad,
}

impl State {
    pub fn new(quirks: &Quirks) -> Self {
        State {
            v: [0; 16],
            i: 0,
            // 0x200 is where ROMs are loaded into memory
            pc: PROGRAM_START,
            stack: Stack::new(),
            timers: Timers::new(),
            memory: Memory::new(quirks.wrap_addresses),
            frame_buffer: FrameBuffer::new(),
            keypad: Keypad::new(),
        }
    }

    /// Sets VF; always done after the operands of an instruction have been read
    pub fn set_flag(&mut self, flag: bool) {
        self.v[0xF] = u8::from(flag);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(&Quirks::default())
    }
}
