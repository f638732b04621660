use std::time::Duration;

use anyhow::anyhow;
use log::{info, warn};
use sdl2::event::Event;

use chip8vm::{Chip8, RuntimeError, Runner, Status, SystemClock};
use display::{Beeper, Display, DisplayConfig};

use crate::keymap::{command, keymap, Command};

/// Pause between passes of the event loop so it doesn't spin
const IDLE: Duration = Duration::from_millis(1);

/// How a run ended
pub enum Exit {
    Quit,
    Halted(RuntimeError),
}

/// Opens a window and runs `chip8` until it quits or halts
pub fn run(mut chip8: Chip8, display_config: &DisplayConfig, mute: bool) -> anyhow::Result<Exit> {
    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display =
        Display::new(&sdl, "Chip-8", display_config).map_err(|e| anyhow!(e))?;
    let beeper = if mute {
        None
    } else {
        match Beeper::new(&sdl) {
            Ok(beeper) => Some(beeper),
            Err(e) => {
                warn!("no audio: {}", e);
                None
            }
        }
    };
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let mut runner = Runner::for_machine(SystemClock::new(), &chip8);
    display
        .render(&chip8.snapshot_display())
        .map_err(|e| anyhow!(e))?;

    while !chip8.is_quit() {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => chip8.request_quit(),
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => match (keymap(key), command(key)) {
                    (Some(kc), _) => chip8.set_key(kc, true),
                    (_, Some(Command::Quit)) => chip8.request_quit(),
                    (_, Some(Command::TogglePause)) => toggle_pause(&mut chip8),
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.set_key(kc, false);
                    }
                }
                _ => continue,
            };
        }

        // Update state
        let report = runner.run(&mut chip8);

        if report.display_dirty {
            display
                .render(&chip8.snapshot_display())
                .map_err(|e| anyhow!(e))?;
        }
        if let Some(err) = report.halted {
            if let Some(beeper) = &beeper {
                beeper.set_active(false);
            }
            return Ok(Exit::Halted(err));
        }
        if let (Some(beeper), Some(active)) = (&beeper, report.sound_changed) {
            beeper.set_active(active);
        }

        std::thread::sleep(IDLE);
    }
    Ok(Exit::Quit)
}

fn toggle_pause(chip8: &mut Chip8) {
    match chip8.status() {
        Status::Paused => {
            info!("resumed");
            chip8.request_resume();
        }
        Status::Running => {
            info!("paused");
            chip8.request_pause();
        }
        _ => {}
    }
}
