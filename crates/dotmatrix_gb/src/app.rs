use anyhow::Result;
use dotmatrix_common::app::App;
use dotmatrix_common::key::Key;
use dotmatrix_common::Color;

use crate::{FrameBuffer, GameBoy, SCREEN_HEIGHT, SCREEN_SCALE, SCREEN_WIDTH};

/// Frontend-facing wrapper for the Game Boy machine.
///
/// Implements the shared `App` trait so a windowed frontend or the headless
/// runner can drive the emulator one displayed frame at a time.
pub struct GameBoyApp {
    pub gb: GameBoy,
    /// Shade ramp used when expanding frames to RGB24.
    pub palette: [Color; 4],
    should_exit: bool,
    frame_counter: u64,
    last_frame: Option<FrameBuffer>,
}

impl Default for GameBoyApp {
    fn default() -> Self {
        Self::new(GameBoy::new())
    }
}

impl GameBoyApp {
    pub fn new(gb: GameBoy) -> Self {
        Self {
            gb,
            palette: Color::DMG_GREYS,
            should_exit: false,
            frame_counter: 0,
            last_frame: None,
        }
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// The most recent frame produced by `update`.
    pub fn last_frame(&self) -> Option<&FrameBuffer> {
        self.last_frame.as_ref()
    }
}

impl App for GameBoyApp {
    fn init(&mut self) {
        log::info!("Game Boy init");
    }

    fn update(&mut self, screen_state: &mut [u8]) -> Result<()> {
        let frame = self.gb.step_frame()?;
        frame.write_rgb24(&self.palette, screen_state);
        self.last_frame = Some(frame);
        self.frame_counter = self.frame_counter.wrapping_add(1);

        if self.frame_counter == 1 || self.frame_counter % 60 == 0 {
            let regs = &self.gb.cpu.regs;
            log::debug!(
                "GB: frame={} pc=0x{:04X} sp=0x{:04X} af=0x{:04X} halted={} stopped={} LY={} mode={:?}",
                self.frame_counter,
                regs.pc,
                regs.sp,
                regs.af(),
                self.gb.cpu.is_halted(),
                self.gb.cpu.is_stopped(),
                self.gb.ppu().ly(),
                self.gb.ppu().mode(),
            );
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: Key, is_pressed: bool) {
        log::debug!("GB key event: {:?} pressed={}", key, is_pressed);
        if key == Key::Escape {
            self.should_exit = true;
            return;
        }
        self.gb.handle_key(key, is_pressed);
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn exit(&mut self) {
        log::info!("Game Boy exit after {} frames", self.frame_counter);
        self.should_exit = true;
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        SCREEN_SCALE
    }

    fn title(&self) -> String {
        "dotmatrix".to_string()
    }
}
