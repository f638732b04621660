use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::WindowCanvas;

use chip8vm::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8vm::Frame;

use crate::config::{rgb, DisplayConfig};

/// # Display
/// The Chip-8 display is composed of 64x32 pixels black/white pixels.
/// Lit and unlit pixels are drawn in the configured foreground and background colours.
/// The display only gets a call to `render` when the Chip-8 frame buffer is updated.
pub struct Display {
    canvas: WindowCanvas,
    foreground: [u8; 3],
    background: [u8; 3],
}

impl Display {
    /// Creates a new window bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `title` the window title
    /// * `config` the scale and colours to draw with
    pub fn new(sdl: &sdl2::Sdl, title: &str, config: &DisplayConfig) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                title,
                DISPLAY_WIDTH as u32 * config.scale,
                DISPLAY_HEIGHT as u32 * config.scale,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| e.to_string())?;

        let mut display = Display {
            canvas,
            foreground: rgb(config.foreground),
            background: rgb(config.background),
        };
        display.clear();
        Ok(display)
    }

    /// Fills the window with the background colour
    pub fn clear(&mut self) {
        let [r, g, b] = self.background;
        self.canvas.set_draw_color(Color::RGB(r, g, b));
        self.canvas.clear();
        self.canvas.present();
    }

    /// Formats the Chip-8 Frame as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a copy of the Chip-8 frame buffer
    pub fn render(&mut self, frame: &Frame) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        let pixels = frame_to_sdl_texture(frame, self.foreground, self.background);
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            for (row, line) in pixels.chunks(DISPLAY_WIDTH * 3).enumerate() {
                buffer[row * pitch..row * pitch + line.len()].copy_from_slice(line);
            }
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

/// Formats a Chip-8 Frame for rendering as an SDL2 texture.
///
/// An SDL2 RGB24 texture is a 1D array of bytes that represent concatenated rows of RGB pixels.
///
/// This is done by:
/// - Flattening the 2D frame into a 1D array by concatenating its rows
/// - Replacing each pixel with the 3 bytes of the foreground or background colour
fn frame_to_sdl_texture(frame: &Frame, foreground: [u8; 3], background: [u8; 3]) -> Vec<u8> {
    frame
        .iter()
        .flat_map(|row| row.iter())
        .flat_map(|&lit| if lit { foreground } else { background })
        .collect()
}
