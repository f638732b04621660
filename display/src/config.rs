use std::num::ParseIntError;

/// How a frame is laid out on screen
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Size multiplier for each Chip-8 pixel
    pub scale: u32,
    /// RGBA colour of lit pixels
    pub foreground: u32,
    /// RGBA colour of unlit pixels
    pub background: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            scale: 20,
            foreground: 0xFFFF_FFFF,
            background: 0x0000_00FF,
        }
    }
}

/// Splits an RGBA colour into its red, green and blue bytes
pub fn rgb(color: u32) -> [u8; 3] {
    [(color >> 24) as u8, (color >> 16) as u8, (color >> 8) as u8]
}

/// Parses an RGBA colour written as hex, with or without a `0x` or `#` prefix.
/// Six digit colours are treated as opaque.
pub fn parse_color(s: &str) -> Result<u32, ParseIntError> {
    let digits = s
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .trim_start_matches('#');
    let color = u32::from_str_radix(digits, 16)?;
    if digits.len() <= 6 {
        Ok(color << 8 | 0xFF)
    } else {
        Ok(color)
    }
}
