/// # Timers
/// The delay and sound timers both count down to 0 at 60Hz.
///
/// Instructions only ever load or read them; `tick` is the only thing that
/// decrements them. Sound is active for as long as the sound timer is non-zero.
#[derive(Debug, Copy, Clone, Default)]
pub struct Timers {
    pub delay: u8,
    sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }

    /// Loads the sound timer, returning the new sound state if it flipped
    pub fn set_sound(&mut self, value: u8) -> Option<bool> {
        let was_active = self.sound_active();
        self.sound = value;
        changed(was_active, self.sound_active())
    }

    /// Advances both timers by one 60Hz unit, returning the new sound state if it flipped
    pub fn tick(&mut self) -> Option<bool> {
        self.delay = self.delay.saturating_sub(1);
        let was_active = self.sound_active();
        self.sound = self.sound.saturating_sub(1);
        changed(was_active, self.sound_active())
    }
}

fn changed(before: bool, after: bool) -> Option<bool> {
    if before == after {
        None
    } else {
        Some(after)
    }
}
