use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// A copy of the display, indexed as [y][x]
pub type Frame = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # Frame Buffer
/// The Chip-8 display is composed of 64x32 monochrome pixels.
///
/// Only `CLS` and `DRW` change it. Hosts never touch it directly; they render
/// from a `Frame` copied out between steps.
#[derive(Copy, Clone)]
pub struct FrameBuffer {
    pixels: Frame,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }

    pub fn snapshot(&self) -> Frame {
        self.pixels
    }

    /// XORs an 8 pixel wide sprite onto the buffer with its top left corner at (x, y).
    ///
    /// Each byte of `sprite` is one row, most significant bit leftmost. Pixels
    /// falling off the right or bottom edge wrap to the opposite side.
    /// Returns true if any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            let py = (y + row) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                if (byte >> (7 - bit)) & 0x1 == 0 {
                    continue;
                }
                let px = (x + bit) % DISPLAY_WIDTH;
                let pixel = &mut self.pixels[py][px];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }
        collision
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
