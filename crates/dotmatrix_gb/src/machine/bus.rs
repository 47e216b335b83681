use super::breakpoints::Breakpoints;
use super::cartridge::{self, Cartridge};
use super::joypad::{Button, Joypad};
use super::ppu::Ppu;
use super::serial::Serial;
use super::timer::Timer;
use super::{FrameBuffer, InterruptController, InterruptFlags, Peripheral, MEMORY_SIZE};

mod dma;
mod init;
mod mmio;
mod traits;

pub(crate) struct GameBoyBus {
    /// Flat backing store for every region not owned by a device.
    pub(crate) memory: Box<[u8; MEMORY_SIZE]>,
    pub(crate) interrupts: InterruptController,
    pub(crate) ppu: Ppu,
    pub(crate) timer: Timer,
    pub(crate) serial: Serial,
    pub(crate) joypad: Joypad,
    pub(crate) breakpoints: Breakpoints,
    /// Inserted cartridge; without one the ROM/RAM windows are flat memory.
    cartridge: Option<Box<dyn Cartridge>>,
    /// External tick consumers (an APU, a link cable).
    peripherals: Vec<Box<dyn Peripheral>>,
}

impl GameBoyBus {
    pub(crate) fn new(randomize_ram: bool) -> Self {
        let mut bus = Self {
            memory: Box::new([0; MEMORY_SIZE]),
            interrupts: InterruptController::new(),
            ppu: Ppu::new(),
            timer: Timer::new(),
            serial: Serial::default(),
            joypad: Joypad::default(),
            breakpoints: Breakpoints::default(),
            cartridge: None,
            peripherals: Vec::new(),
        };
        bus.apply_dmg_initial_io_state(randomize_ram);
        bus
    }

    pub(crate) fn load_rom(&mut self, rom: &[u8]) {
        let cart = cartridge::from_rom(rom);
        log::info!("loaded ROM \"{}\" ({} bytes)", cart.title(), rom.len());
        self.cartridge = Some(cart);
    }

    pub(crate) fn insert_cartridge(&mut self, cart: Box<dyn Cartridge>) {
        self.cartridge = Some(cart);
    }

    /// Take the cartridge out, e.g. to carry it across a reset.
    pub(crate) fn take_cartridge(&mut self) -> Option<Box<dyn Cartridge>> {
        self.cartridge.take()
    }

    pub(crate) fn attach_peripheral(&mut self, peripheral: Box<dyn Peripheral>) {
        self.peripherals.push(peripheral);
    }

    pub(crate) fn take_peripherals(&mut self) -> Vec<Box<dyn Peripheral>> {
        std::mem::take(&mut self.peripherals)
    }

    /// Advance every clocked device by `ticks` and fold their interrupt
    /// requests into IF. Returns a frame when the PPU finished one.
    pub(crate) fn tick(&mut self, ticks: u32) -> Option<FrameBuffer> {
        let events = self.ppu.step(ticks, &self.memory);
        let mut requested = events.interrupts;
        requested |= self.timer.tick(ticks);
        requested |= self.serial.tick(ticks);
        for peripheral in &mut self.peripherals {
            requested |= peripheral.tick(ticks);
        }
        self.interrupts.request_flags(requested);
        events.frame
    }

    /// Offset the PPU against the CPU before the first instruction.
    ///
    /// Only the PPU moves; anything it raises on the way still lands in IF.
    pub(crate) fn skip_ppu_ticks(&mut self, ticks: u32) {
        let events = self.ppu.step(ticks, &self.memory);
        self.apply_effects(mmio::WriteEffects::request(events.interrupts));
    }

    /// P1 lines are read-only to the CPU, so a press lands like any other
    /// register side effect: as a joypad request folded into IF. Only a
    /// line in a selected group can pull P1 low and raise the request.
    pub(crate) fn set_button(&mut self, button: Button, pressed: bool) {
        if self.joypad.set(button, pressed) {
            self.apply_effects(mmio::WriteEffects::request(InterruptFlags::JOYPAD));
        }
    }
}
