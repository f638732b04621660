use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use log::{error, info};

use chip8vm::constants::DEFAULT_INSTRUCTIONS_PER_SECOND;
use chip8vm::{Chip8, Config, Quirks};
use display::{parse_color, DisplayConfig};

mod keymap;
mod run;

/// A Chip-8 interpreter
///
/// Keys 1-4, Q-R, A-F and Z-V are the hex keypad. P pauses, Escape quits.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the ROM to run
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND)]
    ips: u32,

    /// Size of each Chip-8 pixel on screen
    #[arg(long, default_value_t = 20)]
    scale: u32,

    /// Colour of lit pixels as hex RGB or RGBA
    #[arg(long, default_value = "FFFFFFFF", value_parser = parse_color)]
    foreground: u32,

    /// Colour of unlit pixels as hex RGB or RGBA
    #[arg(long, default_value = "000000FF", value_parser = parse_color)]
    background: u32,

    /// 8XY6/8XYE shift VY into VX
    #[arg(long)]
    shift_uses_vy: bool,

    /// FX55/FX65 advance I past the registers copied
    #[arg(long)]
    load_store_increments_i: bool,

    /// FX1E sets VF when I passes 0xFFF
    #[arg(long)]
    add_i_sets_vf: bool,

    /// Wrap addresses past 0xFFF instead of halting
    #[arg(long)]
    wrap_addresses: bool,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Don't open an audio device
    #[arg(long)]
    mute: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            instructions_per_second: self.ips,
            quirks: Quirks {
                shift_uses_vy: self.shift_uses_vy,
                load_store_increments_i: self.load_store_increments_i,
                add_i_sets_vf: self.add_i_sets_vf,
                wrap_addresses: self.wrap_addresses,
            },
            seed: self.seed,
        }
    }

    fn display_config(&self) -> DisplayConfig {
        DisplayConfig {
            scale: self.scale,
            foreground: self.foreground,
            background: self.background,
        }
    }
}

fn load(args: &Args) -> anyhow::Result<Chip8> {
    let mut chip8 = Chip8::with_config(args.config());
    let file = File::open(&args.rom)
        .with_context(|| format!("unable to open {}", args.rom.display()))?;
    let mut reader = BufReader::new(file);
    chip8
        .load_rom(&mut reader)
        .with_context(|| format!("failed to load ROM {}", args.rom.display()))?;
    info!("loaded {}", args.rom.display());
    Ok(chip8)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    let chip8 = match load(&args) {
        Ok(chip8) => chip8,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run::run(chip8, &args.display_config(), args.mute) {
        Ok(run::Exit::Quit) => ExitCode::SUCCESS,
        Ok(run::Exit::Halted(err)) => {
            error!("machine halted: {}", err);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
