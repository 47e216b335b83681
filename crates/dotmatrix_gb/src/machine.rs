mod breakpoints;
mod bus;
mod cartridge;
mod frame;
mod gameboy;
mod interrupts;
mod joypad;
mod peripheral;
pub mod ppu;
mod serial;
mod timer;

pub use breakpoints::{BreakpointHit, BreakpointKind};
pub(crate) use bus::GameBoyBus;
pub use cartridge::{Cartridge, RomOnly};
pub use frame::FrameBuffer;
pub use gameboy::{ControlHandle, GameBoy, GameBoyConfig, RunExit, RunState, Step};
pub use interrupts::{Interrupt, InterruptController, InterruptFlags};
pub use joypad::Button;
pub use peripheral::Peripheral;
pub use ppu::PpuMode;

/// Total addressable memory for the Game Boy (64 KiB).
///
/// The bus keeps a flat array behind the memory map; devices that own a
/// region (cartridge, PPU registers, timer, ...) intercept their addresses
/// before it is touched.
pub(crate) const MEMORY_SIZE: usize = 0x10000;
