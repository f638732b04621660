use sdl2::keyboard::Keycode;

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// This original layout is mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
const KEYPAD: [Keycode; 16] = [
    Keycode::X,
    Keycode::Num1,
    Keycode::Num2,
    Keycode::Num3,
    Keycode::Q,
    Keycode::W,
    Keycode::E,
    Keycode::A,
    Keycode::S,
    Keycode::D,
    Keycode::Z,
    Keycode::C,
    Keycode::Num4,
    Keycode::R,
    Keycode::F,
    Keycode::V,
];

/// Host commands that don't reach the Chip-8
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePause,
}

/// Maps a keyboard key to its Chip-8 key index 0..F
pub fn keymap(key: Keycode) -> Option<u8> {
    KEYPAD.iter().position(|&k| k == key).map(|index| index as u8)
}

/// Maps a keyboard key to a host command
pub fn command(key: Keycode) -> Option<Command> {
    match key {
        Keycode::Escape => Some(Command::Quit),
        Keycode::P => Some(Command::TogglePause),
        _ => None,
    }
}
