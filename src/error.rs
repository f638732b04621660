use std::io;

use thiserror::Error;

/// Failures while putting a ROM into a fresh machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The ROM does not fit between 0x200 and the end of memory
    #[error("ROM is {size} bytes but at most {max} fit in memory")]
    RomTooLarge { size: usize, max: usize },
    /// The byte source could not be read
    #[error("ROM could not be read: {0}")]
    RomUnreadable(io::ErrorKind),
}

// Keeps only the kind so the error stays comparable
impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::RomUnreadable(err.kind())
    }
}

/// Fatal conditions that halt a running machine
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// `CALL` with all stack slots in use
    #[error("stack overflow")]
    StackOverflow,
    /// `RET` with nothing on the stack
    #[error("stack underflow")]
    StackUnderflow,
    /// An instruction fetch or I-relative access landed past 0xFFF
    #[error("address {0:#05X} is outside of memory")]
    OutOfBoundsAddress(usize),
}
