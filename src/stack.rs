use crate::constants::STACK_DEPTH;
use crate::error::RuntimeError;

/// # Stack
/// Return addresses for subroutine calls.
///
/// Holds at most `STACK_DEPTH` addresses; `depth` always points at the next free slot.
#[derive(Debug, Copy, Clone, Default)]
pub struct Stack {
    entries: [u16; STACK_DEPTH],
    depth: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, addr: u16) -> Result<(), RuntimeError> {
        let slot = self
            .entries
            .get_mut(self.depth)
            .ok_or(RuntimeError::StackOverflow)?;
        *slot = addr;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, RuntimeError> {
        if self.depth == 0 {
            return Err(RuntimeError::StackUnderflow);
        }
        self.depth -= 1;
        Ok(self.entries[self.depth])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The live return addresses, oldest first
    pub fn entries(&self) -> &[u16] {
        &self.entries[..self.depth]
    }
}
