use std::io::Read;

use log::{debug, error, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::constants::{KEY_COUNT, MAX_ROM_SIZE, PROGRAM_START};
use crate::error::{LoadError, RuntimeError};
use crate::frame_buffer::Frame;
use crate::instruction::{decode, Instruction, StepEffects};
use crate::state::State;

/// What the machine is currently doing
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Running,
    Paused,
    /// Fetching is suspended until a key goes down; the key goes in this register
    WaitingForKey(u8),
    Quit,
    /// A fatal error stopped the machine
    Halted(RuntimeError),
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the machine `status`
///  - the last key pressed while waiting for one
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - stepping the CPU
/// - advancing its timers
/// - pausing, resuming and quitting
/// - copying out its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    status: Status,
    config: Config,
    rng: StdRng,
    pressed_key: Option<u8>,
    invalid_opcodes: u64,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8 {
            state: State::new(&config.quirks),
            status: Status::Running,
            config,
            rng,
            pressed_key: None,
            invalid_opcodes: 0,
        }
    }

    /// Resets the machine and loads a ROM at 0x200
    ///
    /// # Arguments
    /// * `rom` the raw program bytes
    pub fn load(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(LoadError::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.state = State::new(&self.config.quirks);
        self.state.memory.copy_from(PROGRAM_START, rom);
        self.status = Status::Running;
        self.pressed_key = None;
        self.invalid_opcodes = 0;
        debug!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Resets the machine and loads a ROM from some source
    ///
    /// # Arguments
    /// * `reader` a reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), LoadError> {
        let mut rom = Vec::new();
        // one byte past the limit is enough to know the ROM is too large
        reader
            .take(MAX_ROM_SIZE as u64 + 1)
            .read_to_end(&mut rom)?;
        self.load(&rom)
    }

    /// Advances the machine by a single instruction
    /// - does nothing while paused or quit
    /// - resolves a pending key press while waiting for one
    /// - otherwise fetches, decodes and executes the next opcode
    ///
    /// Fatal errors halt the machine; every later step reports the same error.
    pub fn step(&mut self) -> Result<StepEffects, RuntimeError> {
        match self.status {
            Status::Running => {}
            Status::WaitingForKey(register) => {
                if let Some(key) = self.pressed_key.take() {
                    debug!("key {:X} pressed, resuming with V{:X} = {:X}", key, register, key);
                    self.state.v[register as usize] = key;
                    self.status = Status::Running;
                }
                return Ok(StepEffects::default());
            }
            Status::Halted(err) => return Err(err),
            Status::Paused | Status::Quit => return Ok(StepEffects::default()),
        }

        match self.execute_next() {
            Ok(effects) => Ok(effects),
            Err(err) => {
                error!("halting at pc {:04X}: {}", self.state.pc, err);
                self.status = Status::Halted(err);
                Err(err)
            }
        }
    }

    fn execute_next(&mut self) -> Result<StepEffects, RuntimeError> {
        let pc = self.state.pc;
        let op = self.state.memory.word(pc)?;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            pc
        );
        self.state.pc = pc.wrapping_add(0x2);

        let instruction = decode(op);
        if let Instruction::Invalid(op) = instruction {
            self.invalid_opcodes += 1;
            warn!("ignoring invalid opcode {:04X} at {:04X}", op, pc);
        }

        let outcome = instruction.execute(&mut self.state, &self.config.quirks, &mut self.rng)?;
        if let Some(register) = outcome.awaiting_key {
            debug!("waiting for a key press into V{:X}", register);
            self.pressed_key = None;
            self.status = Status::WaitingForKey(register);
        }
        Ok(outcome.effects)
    }

    /// Counts down both timers by one 60Hz unit.
    /// Returns the new sound state if it flipped.
    /// Timers are frozen while the machine is paused, quit or halted.
    pub fn tick_timers(&mut self) -> Option<bool> {
        match self.status {
            Status::Running | Status::WaitingForKey(_) => self.state.timers.tick(),
            _ => None,
        }
    }

    /// Copies out the frame buffer
    pub fn snapshot_display(&self) -> Frame {
        self.state.frame_buffer.snapshot()
    }

    /// Set the pressed status of a key
    ///
    /// # Arguments
    /// * `key` the index 0..F of the key
    /// * `down` whether the key is now held
    pub fn set_key(&mut self, key: u8, down: bool) {
        if usize::from(key) >= KEY_COUNT {
            warn!("ignoring key {} outside of the keypad", key);
            return;
        }
        let pressed = self.state.keypad.set(key, down);
        if pressed {
            if let Status::WaitingForKey(_) = self.status {
                self.pressed_key = Some(key);
            }
        }
    }

    /// Running -> Paused
    pub fn request_pause(&mut self) {
        if self.status == Status::Running {
            debug!("paused");
            self.status = Status::Paused;
        }
    }

    /// Paused -> Running
    pub fn request_resume(&mut self) {
        if self.status == Status::Paused {
            debug!("resumed");
            self.status = Status::Running;
        }
    }

    /// Any state -> Quit
    pub fn request_quit(&mut self) {
        debug!("quit");
        self.status = Status::Quit;
    }

    pub fn is_quit(&self) -> bool {
        self.status == Status::Quit
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The error that halted the machine, if any
    pub fn halted(&self) -> Option<RuntimeError> {
        match self.status {
            Status::Halted(err) => Some(err),
            _ => None,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sound_active(&self) -> bool {
        self.state.timers.sound_active()
    }

    /// Number of invalid opcodes skipped since the ROM was loaded
    pub fn invalid_opcodes(&self) -> u64 {
        self.invalid_opcodes
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Quirks;
    use crate::constants::SPRITE_SHEET;
    use std::io;

    fn loaded(rom: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::with_config(Config {
            seed: Some(8),
            ..Config::default()
        });
        chip8.load(rom).unwrap();
        chip8
    }

    struct Unreadable;

    impl io::Read for Unreadable {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "broken"))
        }
    }

    #[test]
    fn test_load_places_font_and_rom() {
        let chip8 = loaded(&[0x00, 0xE0]);
        let memory = chip8.state().memory.bytes();
        assert_eq!(memory[0x00..0x50], SPRITE_SHEET[..]);
        assert_eq!(memory[0x200..0x202], [0x00, 0xE0]);
        assert_eq!(chip8.state().pc, 0x200);
        assert_eq!(chip8.status(), Status::Running);
    }

    #[test]
    fn test_load_resets_machine() {
        let mut chip8 = loaded(&[0x60, 0x05, 0x22, 0x00]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        chip8.request_quit();
        chip8.load(&[0x00, 0xE0]).unwrap();
        assert_eq!(chip8.state().v[0x0], 0x0);
        assert_eq!(chip8.state().stack.depth(), 0);
        assert_eq!(chip8.state().pc, 0x200);
        assert_eq!(chip8.status(), Status::Running);
    }

    #[test]
    fn test_load_accepts_largest_rom() {
        let mut chip8 = Chip8::new();
        assert_eq!(chip8.load(&[0xAA; MAX_ROM_SIZE]), Ok(()));
        assert_eq!(chip8.state().memory.bytes()[0xFFF], 0xAA);
    }

    #[test]
    fn test_load_rejects_large_rom() {
        let mut chip8 = Chip8::new();
        assert_eq!(
            chip8.load(&[0; MAX_ROM_SIZE + 1]),
            Err(LoadError::RomTooLarge {
                size: 3585,
                max: 3584
            })
        );
    }

    #[test]
    fn test_load_rom_from_reader() {
        let mut chip8 = Chip8::new();
        let mut rom: &[u8] = &[0x12, 0x00];
        chip8.load_rom(&mut rom).unwrap();
        assert_eq!(chip8.state().memory.word(0x200), Ok(0x1200));
    }

    #[test]
    fn test_load_rom_too_large_from_reader() {
        let mut chip8 = Chip8::new();
        let mut rom = io::repeat(0x1).take(10_000);
        assert!(matches!(
            chip8.load_rom(&mut rom),
            Err(LoadError::RomTooLarge { .. })
        ));
    }

    #[test]
    fn test_load_rom_unreadable() {
        let mut chip8 = Chip8::new();
        assert_eq!(
            chip8.load_rom(&mut Unreadable),
            Err(LoadError::RomUnreadable(io::ErrorKind::Other))
        );
    }

    #[test]
    fn test_runs_small_program() {
        let mut chip8 = loaded(&[0x60, 0x05, 0x70, 0x03, 0xA2, 0x00]);
        for _ in 0..3 {
            chip8.step().unwrap();
        }
        assert_eq!(chip8.state().v[0x0], 8);
        assert_eq!(chip8.state().i, 0x200);
        assert_eq!(chip8.state().pc, 0x206);
    }

    #[test]
    fn test_self_jump_stays_put() {
        let mut chip8 = loaded(&[0x12, 0x00]);
        for _ in 0..100 {
            chip8.step().unwrap();
            assert_eq!(chip8.state().pc, 0x200);
        }
    }

    #[test]
    fn test_call_then_ret_returns_after_call() {
        // 0x200 CALL 0x206; 0x202 JP 0x202; 0x204 pad; 0x206 RET
        let mut chip8 = loaded(&[0x22, 0x06, 0x12, 0x02, 0x00, 0x00, 0x00, 0xEE]);
        chip8.step().unwrap();
        assert_eq!(chip8.state().pc, 0x206);
        chip8.step().unwrap();
        assert_eq!(chip8.state().pc, 0x202);
    }

    #[test]
    fn test_deep_recursion_overflows_and_halts() {
        // CALL 0x200 forever
        let mut chip8 = loaded(&[0x22, 0x00]);
        for _ in 0..16 {
            chip8.step().unwrap();
        }
        assert_eq!(chip8.step(), Err(RuntimeError::StackOverflow));
        assert_eq!(chip8.halted(), Some(RuntimeError::StackOverflow));
        assert_eq!(chip8.step(), Err(RuntimeError::StackOverflow));
        assert!(!chip8.is_quit());
    }

    #[test]
    fn test_ret_on_empty_stack_halts() {
        let mut chip8 = loaded(&[0x00, 0xEE]);
        assert_eq!(chip8.step(), Err(RuntimeError::StackUnderflow));
        assert_eq!(chip8.status(), Status::Halted(RuntimeError::StackUnderflow));
    }

    #[test]
    fn test_fetch_past_memory_halts() {
        // JP 0xFFF; the fetch there needs 0x1000
        let mut chip8 = loaded(&[0x1F, 0xFF]);
        chip8.step().unwrap();
        assert_eq!(chip8.step(), Err(RuntimeError::OutOfBoundsAddress(0x1000)));
    }

    #[test]
    fn test_fetch_past_memory_wraps_with_quirk() {
        let mut chip8 = Chip8::with_config(Config {
            quirks: Quirks {
                wrap_addresses: true,
                ..Quirks::default()
            },
            ..Config::default()
        });
        chip8.load(&[0x1F, 0xFF]).unwrap();
        chip8.step().unwrap();
        assert!(chip8.step().is_ok());
        assert_eq!(chip8.halted(), None);
    }

    #[test]
    fn test_invalid_opcode_is_counted_and_skipped() {
        let mut chip8 = loaded(&[0xFF, 0xFF, 0x60, 0x01]);
        assert_eq!(chip8.step(), Ok(StepEffects::default()));
        chip8.step().unwrap();
        assert_eq!(chip8.invalid_opcodes(), 1);
        assert_eq!(chip8.state().v[0x0], 0x1);
        assert_eq!(chip8.status(), Status::Running);
    }

    #[test]
    fn test_cls_then_snapshot_is_blank() {
        // LD F, V0; DRW V0, V0, 5; CLS
        let mut chip8 = loaded(&[0xF0, 0x29, 0xD0, 0x05, 0x00, 0xE0]);
        chip8.step().unwrap();
        assert!(chip8.step().unwrap().display_dirty);
        assert!(chip8.snapshot_display().iter().flatten().any(|&p| p));
        assert!(chip8.step().unwrap().display_dirty);
        assert!(chip8.snapshot_display().iter().flatten().all(|&p| !p));
    }

    #[test]
    fn test_waits_for_key() {
        // LD V5, K; LD V6, 1
        let mut chip8 = loaded(&[0xF5, 0x0A, 0x66, 0x01]);
        chip8.step().unwrap();
        assert_eq!(chip8.status(), Status::WaitingForKey(0x5));
        for _ in 0..10 {
            chip8.step().unwrap();
            assert_eq!(chip8.status(), Status::WaitingForKey(0x5));
            assert_eq!(chip8.state().pc, 0x202);
        }
        chip8.set_key(3, true);
        chip8.step().unwrap();
        assert_eq!(chip8.state().v[0x5], 3);
        assert_eq!(chip8.status(), Status::Running);
        assert_eq!(chip8.state().pc, 0x202);
        chip8.step().unwrap();
        assert_eq!(chip8.state().v[0x6], 1);
    }

    #[test]
    fn test_held_key_does_not_resolve_wait() {
        let mut chip8 = loaded(&[0xF0, 0x0A]);
        chip8.set_key(7, true);
        chip8.step().unwrap();
        chip8.set_key(7, true);
        chip8.step().unwrap();
        assert_eq!(chip8.status(), Status::WaitingForKey(0x0));
        chip8.set_key(7, false);
        chip8.set_key(7, true);
        chip8.step().unwrap();
        assert_eq!(chip8.status(), Status::Running);
        assert_eq!(chip8.state().v[0x0], 7);
    }

    #[test]
    fn test_ignores_keys_outside_keypad() {
        let mut chip8 = loaded(&[0xF0, 0x0A]);
        chip8.step().unwrap();
        chip8.set_key(0x10, true);
        chip8.step().unwrap();
        assert_eq!(chip8.status(), Status::WaitingForKey(0x0));
    }

    #[test]
    fn test_pause_stops_execution() {
        let mut chip8 = loaded(&[0x70, 0x01, 0x12, 0x00]);
        chip8.request_pause();
        assert_eq!(chip8.status(), Status::Paused);
        chip8.step().unwrap();
        assert_eq!(chip8.state().pc, 0x200);
        chip8.request_resume();
        chip8.step().unwrap();
        assert_eq!(chip8.state().v[0x0], 1);
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut chip8 = loaded(&[0x70, 0x01]);
        chip8.request_quit();
        chip8.request_resume();
        chip8.step().unwrap();
        assert!(chip8.is_quit());
        assert_eq!(chip8.state().v[0x0], 0);
    }

    #[test]
    fn test_timers_tick_independently_of_steps() {
        // LD V0, 2; LD DT, V0; LD ST, V0
        let mut chip8 = loaded(&[0x60, 0x02, 0xF0, 0x15, 0xF0, 0x18]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.step().unwrap().sound_changed, Some(true));
        assert!(chip8.sound_active());
        assert_eq!(chip8.state().timers.delay, 2);
        assert_eq!(chip8.tick_timers(), None);
        assert_eq!(chip8.tick_timers(), Some(false));
        assert_eq!(chip8.state().timers.delay, 0);
        assert!(!chip8.sound_active());
    }

    #[test]
    fn test_timers_frozen_while_paused() {
        let mut chip8 = loaded(&[0x60, 0x02, 0xF0, 0x15]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        chip8.request_pause();
        chip8.tick_timers();
        assert_eq!(chip8.state().timers.delay, 2);
    }
}
