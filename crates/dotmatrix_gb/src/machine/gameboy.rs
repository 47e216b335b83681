use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use dotmatrix_common::key::Key;
use typed_builder::TypedBuilder;

use super::breakpoints::{BreakpointHit, BreakpointKind};
use super::ppu::{Ppu, FRAME_TICKS, LINE_TICKS};
use super::{Button, Cartridge, FrameBuffer, GameBoyBus, Peripheral, MEMORY_SIZE};
use crate::cpu::Cpu;
use crate::{GbError, Result};

/// Construction-time options for [`GameBoy`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct GameBoyConfig {
    /// Fill WRAM/HRAM with deterministic pseudo-random bytes at power-on
    /// instead of zeros.
    #[builder(default = true)]
    pub randomize_ram: bool,
    /// Ticks the PPU runs ahead of the CPU at power-on, within one line.
    #[builder(default = 0)]
    pub ppu_start_offset: u32,
}

impl Default for GameBoyConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Outcome of one [`GameBoy::step`].
#[derive(Debug, Default)]
pub struct Step {
    pub ticks: u32,
    /// The picture finished during this step, if any.
    pub frame: Option<FrameBuffer>,
    /// A read, write or jump breakpoint tripped by this step.
    pub breakpoint: Option<BreakpointHit>,
}

/// Why [`GameBoy::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    Paused,
    /// The machine was stopped and has been reset.
    Stopped,
    Breakpoint(BreakpointHit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Running,
    Paused,
    Stopped,
}

impl RunState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => RunState::Running,
            1 => RunState::Paused,
            _ => RunState::Stopped,
        }
    }
}

/// Cloneable run/pause/stop switch for a [`GameBoy`].
///
/// The emulation loop only looks at it between instructions, so a request
/// from another thread never splits an instruction.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    state: Arc<AtomicU8>,
}

impl ControlHandle {
    fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(RunState::Paused as u8)),
        }
    }

    pub fn state(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set(&self, state: RunState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub fn pause(&self) {
        self.set(RunState::Paused);
    }

    pub fn stop(&self) {
        self.set(RunState::Stopped);
    }
}

/// High-level Game Boy machine.
///
/// Holds the CPU core, the bus with every device behind it, and the run
/// state. This is the main entry point used by the `GameBoyApp` wrapper and
/// the headless runner.
pub struct GameBoy {
    pub cpu: Cpu,
    pub(crate) bus: GameBoyBus,
    config: GameBoyConfig,
    control: ControlHandle,
    /// PC whose execution breakpoint already stopped a run; the next run
    /// steps over it once.
    resume_pc: Option<u16>,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    pub fn new() -> Self {
        Self::with_config(GameBoyConfig::default())
    }

    pub fn with_config(config: GameBoyConfig) -> Self {
        let mut gb = Self {
            cpu: Cpu::new(),
            bus: GameBoyBus::new(config.randomize_ram),
            config,
            control: ControlHandle::new(),
            resume_pc: None,
        };
        gb.apply_start_offset();
        gb
    }

    fn apply_start_offset(&mut self) {
        let offset = self.config.ppu_start_offset % LINE_TICKS;
        if offset != 0 {
            self.bus.skip_ppu_ticks(offset);
        }
    }

    /// Back to power-on state.
    ///
    /// The inserted cartridge, attached peripherals and breakpoints survive;
    /// anything written with [`load_program`](Self::load_program) does not.
    pub fn reset(&mut self) {
        let cartridge = self.bus.take_cartridge();
        let peripherals = self.bus.take_peripherals();
        let mut breakpoints = std::mem::take(&mut self.bus.breakpoints);
        breakpoints.take_hit();

        self.cpu.reset();
        self.bus = GameBoyBus::new(self.config.randomize_ram);
        if let Some(cart) = cartridge {
            self.bus.insert_cartridge(cart);
        }
        for peripheral in peripherals {
            self.bus.attach_peripheral(peripheral);
        }
        self.bus.breakpoints = breakpoints;
        self.resume_pc = None;
        self.apply_start_offset();
    }

    /// Insert a ROM image as a cartridge.
    pub fn load_rom(&mut self, rom: &[u8]) {
        self.bus.load_rom(rom);
        // PC is already 0x0100 from the simulated boot state.
    }

    pub fn insert_cartridge(&mut self, cartridge: Box<dyn Cartridge>) {
        self.bus.insert_cartridge(cartridge);
    }

    /// Copy raw bytes into the flat address space, bypassing devices.
    ///
    /// Meant for test programs run without a cartridge. Fails when the
    /// block would run past `0xFFFF`.
    pub fn load_program(&mut self, addr: u16, bytes: &[u8]) -> Result<()> {
        let start = addr as usize;
        let end = start + bytes.len();
        if end > MEMORY_SIZE {
            return Err(GbError::OutOfRangeAccess {
                addr: start,
                len: bytes.len(),
            });
        }
        self.bus.memory[start..end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn attach_peripheral(&mut self, peripheral: Box<dyn Peripheral>) {
        self.bus.attach_peripheral(peripheral);
    }

    pub fn ppu(&self) -> &Ppu {
        &self.bus.ppu
    }

    /// Every byte the serial port has shifted out so far.
    pub fn serial_output(&self) -> &[u8] {
        &self.bus.serial.output
    }

    pub fn control_handle(&self) -> ControlHandle {
        self.control.clone()
    }

    pub fn run_state(&self) -> RunState {
        self.control.state()
    }

    pub fn add_breakpoint(&mut self, kind: BreakpointKind, addr: u16) {
        self.bus.breakpoints.add(kind, addr);
    }

    pub fn remove_breakpoint(&mut self, kind: BreakpointKind, addr: u16) -> bool {
        self.bus.breakpoints.remove(kind, addr)
    }

    pub fn clear_breakpoints(&mut self) {
        self.bus.breakpoints.clear();
    }

    /// Execute one instruction (or interrupt entry, or idle slice) and
    /// advance every other device by the ticks it took.
    pub fn step(&mut self) -> Result<Step> {
        let pc = self.cpu.regs.pc;
        self.bus.breakpoints.begin_instruction(pc);

        let ticks = self.cpu.step(&mut self.bus)?;
        let frame = self.bus.tick(ticks);

        let mut breakpoint = self.bus.breakpoints.take_hit();
        if breakpoint.is_none() && self.cpu.jumped() {
            breakpoint = self.bus.breakpoints.check_jump(pc, self.cpu.regs.pc);
        }
        Ok(Step {
            ticks,
            frame,
            breakpoint,
        })
    }

    /// Step until the PPU delivers a frame.
    ///
    /// With the display off no frame ever completes; a blank one is
    /// returned after a frame's worth of ticks instead.
    pub fn step_frame(&mut self) -> Result<FrameBuffer> {
        let mut elapsed = 0u32;
        loop {
            let step = self.step()?;
            if let Some(frame) = step.frame {
                return Ok(frame);
            }
            elapsed = elapsed.saturating_add(step.ticks);
            if elapsed >= FRAME_TICKS && !self.bus.ppu.lcd_enabled() {
                return Ok(FrameBuffer::new());
            }
        }
    }

    /// Run until paused, stopped or a breakpoint hits, handing every
    /// finished frame to `sink`.
    ///
    /// Calling `run` marks the machine as running. Execution breakpoints
    /// stop before the instruction at their address; resuming steps over it.
    pub fn run<F: FnMut(FrameBuffer)>(&mut self, mut sink: F) -> Result<RunExit> {
        self.control.set(RunState::Running);
        log::info!("run: starting at pc=0x{:04X}", self.cpu.regs.pc);

        let exit = loop {
            match self.control.state() {
                RunState::Running => {}
                RunState::Paused => break RunExit::Paused,
                RunState::Stopped => {
                    self.reset();
                    break RunExit::Stopped;
                }
            }

            let pc = self.cpu.regs.pc;
            if self.resume_pc.take() != Some(pc) {
                if let Some(hit) = self.bus.breakpoints.check_execution(pc) {
                    self.resume_pc = Some(pc);
                    self.control.pause();
                    break RunExit::Breakpoint(hit);
                }
            }

            let step = match self.step() {
                Ok(step) => step,
                Err(err) => {
                    self.control.pause();
                    log::info!("run: aborted at pc=0x{:04X}: {}", self.cpu.regs.pc, err);
                    return Err(err);
                }
            };
            if let Some(frame) = step.frame {
                sink(frame);
            }
            if let Some(hit) = step.breakpoint {
                self.control.pause();
                break RunExit::Breakpoint(hit);
            }
        };

        log::info!("run: {:?} at pc=0x{:04X}", exit, self.cpu.regs.pc);
        Ok(exit)
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    /// End the current run and reset the machine, keeping the cartridge.
    pub fn stop(&mut self) {
        self.control.stop();
        self.reset();
    }

    pub fn press_button(&mut self, button: Button) {
        self.bus.set_button(button, true);
    }

    pub fn release_button(&mut self, button: Button) {
        self.bus.set_button(button, false);
    }

    /// Update joypad state from a frontend key event.
    ///
    /// Arrow keys drive the d-pad; Z => A, X => B, A => Select, S => Start.
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        if let Some(button) = Button::from_key(key) {
            self.bus.set_button(button, pressed);
        }
    }
}
