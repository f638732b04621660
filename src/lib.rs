pub use chip8::{Chip8, Status};
pub use config::{Config, Quirks};
pub use error::{LoadError, RuntimeError};
pub use frame_buffer::{Frame, FrameBuffer};
pub use instruction::{decode, Instruction, StepEffects};
pub use keypad::Keypad;
pub use memory::Memory;
pub use opcode::Opcode;
pub use runner::{Clock, ManualClock, Report, Runner, SystemClock};
pub use stack::Stack;
pub use state::State;
pub use timers::Timers;

mod chip8;
mod config;
pub mod constants;
mod error;
mod frame_buffer;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod operations;
mod runner;
mod state;
mod stack;
mod timers;
