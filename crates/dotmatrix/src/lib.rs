use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use dotmatrix_common::app::App;
use dotmatrix_gb::{GameBoy, GameBoyApp, GameBoyConfig, SCREEN_HEIGHT, SCREEN_WIDTH};
use typed_builder::TypedBuilder;

pub const FRAMES_ENV: &str = "DOTMATRIX_FRAMES";
pub const PPU_START_OFFSET_ENV: &str = "DOTMATRIX_PPU_START_OFFSET";

/// Headless Game Boy runner.
///
/// Command-line values win over the environment.
#[derive(Debug, Clone, PartialEq, Eq, Parser, TypedBuilder)]
#[command(name = "dotmatrix", version)]
#[command(about = "Run a Game Boy ROM headlessly and dump its last frame", long_about = None)]
pub struct RunConfig {
    /// Path to the cartridge ROM
    #[builder(setter(into))]
    pub rom_path: PathBuf,

    /// Frames to emulate before exiting
    #[arg(env = FRAMES_ENV, default_value_t = 120)]
    #[builder(default = 120)]
    pub frames: u32,

    /// Where to write the last frame as raw RGB24
    #[builder(default, setter(strip_option, into))]
    pub dump_path: Option<PathBuf>,

    /// Ticks the PPU runs ahead of the CPU at power-on
    #[arg(long, env = PPU_START_OFFSET_ENV, default_value_t = 0)]
    #[builder(default = 0)]
    pub ppu_start_offset: u32,

    /// Start with zeroed WRAM/HRAM instead of pseudo-random bytes
    #[arg(long = "zero-ram", action = ArgAction::SetFalse)]
    #[builder(default = true)]
    pub randomize_ram: bool,
}

impl RunConfig {
    fn machine_config(&self) -> GameBoyConfig {
        GameBoyConfig::builder()
            .randomize_ram(self.randomize_ram)
            .ppu_start_offset(self.ppu_start_offset)
            .build()
    }
}

/// Load the ROM named by `config`, emulate the requested frames, print any
/// serial output and optionally dump the final frame.
pub fn run(config: RunConfig) -> Result<()> {
    let rom = std::fs::read(&config.rom_path)
        .with_context(|| format!("failed to read ROM '{}'", config.rom_path.display()))?;

    let mut screen = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
    let app = run_rom(&config, &rom, &mut screen)?;

    let serial = app.gb.serial_output();
    if !serial.is_empty() {
        println!("{}", String::from_utf8_lossy(serial));
    }

    if let Some(path) = &config.dump_path {
        std::fs::write(path, &screen)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        println!(
            "Wrote {} bytes ({}x{} rgb24) after {} frames to '{}'",
            screen.len(),
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
            config.frames,
            path.display()
        );
    }
    Ok(())
}

/// Drive a [`GameBoyApp`] for `config.frames` frames, leaving the last one
/// in `screen` as RGB24.
pub fn run_rom(config: &RunConfig, rom: &[u8], screen: &mut [u8]) -> Result<GameBoyApp> {
    let mut gb = GameBoy::with_config(config.machine_config());
    gb.load_rom(rom);

    let mut app = GameBoyApp::new(gb);
    app.init();
    for frame in 0..config.frames {
        if app.should_exit() {
            break;
        }
        app.update(screen).with_context(|| {
            format!(
                "emulation failed in frame {} at pc=0x{:04X}",
                frame, app.gb.cpu.regs.pc
            )
        })?;
    }
    app.exit();
    Ok(app)
}
