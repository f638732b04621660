use crate::constants::{FONT_START, MEMORY_SIZE, SPRITE_SHEET};
use crate::error::RuntimeError;

/// # Memory
/// 4096 bytes of flat, byte addressable memory.
///
/// ```text
/// 0x000..0x050  sprite sheet
/// 0x050..0x200  unused (reserved for the interpreter on original hardware)
/// 0x200..0x1000 program and working data
/// ```
///
/// Every access is checked against the end of memory. With `wrap` set the
/// address is folded back into range instead of failing.
#[derive(Copy, Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
    wrap: bool,
}

impl Memory {
    /// Creates memory holding only the sprite sheet
    pub fn new(wrap: bool) -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        bytes[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes, wrap }
    }

    /// Maps `base + offset` to an index into memory
    fn resolve(&self, base: u16, offset: usize) -> Result<usize, RuntimeError> {
        let addr = usize::from(base) + offset;
        if addr < MEMORY_SIZE {
            Ok(addr)
        } else if self.wrap {
            Ok(addr % MEMORY_SIZE)
        } else {
            Err(RuntimeError::OutOfBoundsAddress(addr))
        }
    }

    pub fn read(&self, base: u16, offset: usize) -> Result<u8, RuntimeError> {
        Ok(self.bytes[self.resolve(base, offset)?])
    }

    pub fn write(&mut self, base: u16, offset: usize, value: u8) -> Result<(), RuntimeError> {
        let addr = self.resolve(base, offset)?;
        self.bytes[addr] = value;
        Ok(())
    }

    /// Reads the big-endian instruction word at `addr`
    pub fn word(&self, addr: u16) -> Result<u16, RuntimeError> {
        let high = u16::from(self.read(addr, 0)?);
        let low = u16::from(self.read(addr, 1)?);
        Ok(high << 8 | low)
    }

    /// Copies `data` into memory starting at `addr`.
    /// Callers are expected to have checked that `data` fits.
    pub(crate) fn copy_from(&mut self, addr: u16, data: &[u8]) {
        let start = usize::from(addr);
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }

    /// The raw contents of memory
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_holds_sprite_sheet() {
        let memory = Memory::new(false);
        assert_eq!(memory.bytes()[0x00..0x50], SPRITE_SHEET[..]);
        assert!(memory.bytes()[0x50..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_memory_reads_word() {
        let mut memory = Memory::new(false);
        memory.copy_from(0x200, &[0xAA, 0xBB]);
        assert_eq!(memory.word(0x200), Ok(0xAABB));
    }

    #[test]
    fn test_memory_rejects_out_of_bounds() {
        let memory = Memory::new(false);
        assert_eq!(memory.read(0xFFF, 0), Ok(0));
        assert_eq!(
            memory.read(0xFFF, 1),
            Err(RuntimeError::OutOfBoundsAddress(0x1000))
        );
        assert_eq!(
            memory.word(0xFFF),
            Err(RuntimeError::OutOfBoundsAddress(0x1000))
        );
    }

    #[test]
    fn test_memory_wraps_when_enabled() {
        let mut memory = Memory::new(true);
        memory.write(0xFFF, 1, 0x42).unwrap();
        assert_eq!(memory.read(0x000, 0), Ok(0x42));
        assert_eq!(memory.read(0x1FFF, 0), Ok(memory.bytes()[0xFFF]));
    }

    #[test]
    fn test_memory_write_out_of_bounds() {
        let mut memory = Memory::new(false);
        assert_eq!(
            memory.write(0xFFFF, 0, 1),
            Err(RuntimeError::OutOfBoundsAddress(0xFFFF))
        );
    }
}
