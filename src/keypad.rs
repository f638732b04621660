use crate::constants::KEY_COUNT;

/// # Keypad
/// Pressed state of the 16 hexadecimal keys 0..F, written only by the host.
#[derive(Debug, Copy, Clone, Default)]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the state of `key`; returns true only on an up -> down transition
    pub fn set(&mut self, key: u8, down: bool) -> bool {
        let slot = &mut self.pressed[usize::from(key) % KEY_COUNT];
        let pressed = down && !*slot;
        *slot = down;
        pressed
    }

    /// Keys are selected by the low nibble of `key`
    pub fn is_down(&self, key: u8) -> bool {
        self.pressed[usize::from(key) % KEY_COUNT]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_down_transition_once() {
        let mut keypad = Keypad::new();
        assert!(keypad.set(0x3, true));
        assert!(!keypad.set(0x3, true));
        assert!(keypad.is_down(0x3));
        assert!(!keypad.set(0x3, false));
        assert!(!keypad.is_down(0x3));
        assert!(keypad.set(0x3, true));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut keypad = Keypad::new();
        keypad.set(0xA, true);
        assert!(keypad.is_down(0xA));
        assert!(!keypad.is_down(0xB));
    }
}
