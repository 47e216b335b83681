pub mod app;
pub mod cpu;
mod error;
pub mod machine;

pub use app::GameBoyApp;
pub use error::{GbError, Result};
pub use machine::{
    BreakpointHit, BreakpointKind, Button, Cartridge, ControlHandle, FrameBuffer, GameBoy,
    GameBoyConfig, Interrupt, InterruptController, InterruptFlags, Peripheral, PpuMode, RomOnly,
    RunExit, RunState, Step,
};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
/// Default integer scaling factor for windowed frontends.
pub const SCREEN_SCALE: u32 = 4;
