pub use audio::Beeper;
pub use config::{parse_color, DisplayConfig};
pub use display::Display;

mod audio;
mod config;
mod display;
