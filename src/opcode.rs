/// # Opcode fields
///
/// Every instruction is one big-endian 16-bit word read as four nibbles:
/// ```text
/// | op | x  | y  | n  |
/// |    |    | nn      |
/// |    | nnn          |
/// ```
/// `op` picks the instruction group and, where a group holds several
/// instructions, `n` or `nn` picks the member. The rest is operands:
/// `x` and `y` name registers, `nn` is an 8-bit immediate and `nnn` a 12-bit
/// address. Which fields apply depends on the instruction, see `decode`.
pub trait Opcode {
    /// `(op, x, y, n)`
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// Bits 8..12, a register index
    fn x(&self) -> u8;

    /// Bits 4..8, a register index
    fn y(&self) -> u8;

    /// Bits 0..4, a sprite height or sub-operation
    fn n(&self) -> u8;

    /// Low byte, an immediate value
    fn nn(&self) -> u8;

    /// Low 12 bits, an address
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (((self & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn nn(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_nibbles() {
        let op: u16 = 0xABCD;
        assert_eq!(op.nibbles(), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_fields_of_draw() {
        // DRW V3, VA, 7
        let op: u16 = 0xD3A7;
        assert_eq!(op.nibbles().0, 0xD);
        assert_eq!(op.x(), 0x3);
        assert_eq!(op.y(), 0xA);
        assert_eq!(op.n(), 0x7);
    }

    #[test]
    fn test_fields() {
        let op: u16 = 0xABCD;
        assert_eq!(op.x(), 0xB);
        assert_eq!(op.y(), 0xC);
        assert_eq!(op.n(), 0xD);
        assert_eq!(op.nn(), 0xCD);
        assert_eq!(op.nnn(), 0x0BCD);
    }
}
