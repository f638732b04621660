use log::debug;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

const FREQUENCY: i32 = 44_100;
const TONE_HZ: f32 = 440.0;
const VOLUME: f32 = 0.25;

struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase <= 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// # Beeper
/// The Chip-8 has a single tone which sounds while its sound timer is non-zero.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
}

impl Beeper {
    /// Opens the default playback device, initially silent
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let audio_subsystem = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(FREQUENCY),
            channels: Some(1),
            samples: None,
        };
        let device = audio_subsystem.open_playback(None, &desired, |spec| {
            debug!("opened audio device at {}Hz", spec.freq);
            SquareWave {
                phase_inc: TONE_HZ / spec.freq as f32,
                phase: 0.0,
                volume: VOLUME,
            }
        })?;
        Ok(Beeper { device })
    }

    /// Starts or stops the tone
    pub fn set_active(&self, active: bool) {
        if active {
            self.device.resume();
        } else {
            self.device.pause();
        }
    }
}
