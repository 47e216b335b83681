//! Scanline-level picture processing unit.
//!
//! The PPU is a four-mode state machine advanced by the exact tick count the
//! CPU just spent. A single per-line accumulator drives every transition, so
//! a frame always lasts `LINE_TICKS * TOTAL_LINES` ticks no matter how the
//! ticks are batched.

mod registers;
mod render;

pub use registers::{Lcdc, OamEntry, StatSelect};

use super::{FrameBuffer, InterruptFlags, MEMORY_SIZE};
use crate::{GbError, Result};

pub const OAM_SEARCH_TICKS: u32 = 80;
pub const PIXEL_TRANSFER_TICKS: u32 = 172;
pub const HBLANK_TICKS: u32 = 204;
pub const LINE_TICKS: u32 = OAM_SEARCH_TICKS + PIXEL_TRANSFER_TICKS + HBLANK_TICKS;
pub const VISIBLE_LINES: u8 = 144;
pub const TOTAL_LINES: u8 = 154;
pub const FRAME_TICKS: u32 = LINE_TICKS * TOTAL_LINES as u32;

const OAM_START: usize = 0xFE00;
const OAM_ENTRIES: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PpuMode {
    HBlank,
    VBlank,
    OamSearch,
    PixelTransfer,
}

impl PpuMode {
    /// Value reported in STAT bits 0-1.
    pub fn bits(self) -> u8 {
        match self {
            PpuMode::HBlank => 0,
            PpuMode::VBlank => 1,
            PpuMode::OamSearch => 2,
            PpuMode::PixelTransfer => 3,
        }
    }
}

/// What a call to [`Ppu::step`] produced.
#[derive(Debug, Default)]
pub struct PpuEvents {
    pub interrupts: InterruptFlags,
    /// Set once per 154 lines, when LY wraps back to 0.
    pub frame: Option<FrameBuffer>,
}

pub struct Ppu {
    lcdc: Lcdc,
    stat_select: StatSelect,
    scy: u8,
    scx: u8,
    ly: u8,
    lyc: u8,
    bgp: u8,
    obp0: u8,
    obp1: u8,
    wy: u8,
    wx: u8,

    mode: PpuMode,
    line_ticks: u32,
    /// WY as sampled at the start of the current frame.
    window_start_line: u8,
    /// Internal line counter of the window; only advances on lines where
    /// the window was drawn.
    window_line: u8,
    /// OR of the enabled mode sources, used for edge detection.
    stat_line: bool,
    /// LY==LYC with the LYC source enabled; tracked apart from the mode
    /// sources so a match is never hidden behind an already-high line.
    lyc_line: bool,
    oam: [OamEntry; OAM_ENTRIES],
    frame: FrameBuffer,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// Power-on state with the values the DMG boot ROM leaves behind.
    pub fn new() -> Self {
        let mut ppu = Self {
            lcdc: Lcdc::from_bits_retain(0x91),
            stat_select: StatSelect::empty(),
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: 0xFC,
            obp0: 0xFF,
            obp1: 0xFF,
            wy: 0,
            wx: 0,
            mode: PpuMode::OamSearch,
            line_ticks: 0,
            window_start_line: 0,
            window_line: 0,
            stat_line: false,
            lyc_line: false,
            oam: [OamEntry::default(); OAM_ENTRIES],
            frame: FrameBuffer::new(),
        };
        ppu.stat_line = ppu.mode_stat_line();
        ppu.lyc_line = ppu.lyc_stat_line();
        ppu
    }

    pub fn mode(&self) -> PpuMode {
        self.mode
    }

    pub fn ly(&self) -> u8 {
        self.ly
    }

    pub fn lcd_enabled(&self) -> bool {
        self.lcdc.contains(Lcdc::LCD_ENABLE)
    }

    /// Whether the CPU may currently touch VRAM.
    pub fn vram_accessible(&self) -> bool {
        !self.lcd_enabled() || self.mode != PpuMode::PixelTransfer
    }

    /// Whether the CPU may currently touch OAM.
    pub fn oam_accessible(&self) -> bool {
        !self.lcd_enabled() || matches!(self.mode, PpuMode::HBlank | PpuMode::VBlank)
    }

    /// Absorb `ticks`, crossing as many mode boundaries as needed.
    pub fn step(&mut self, ticks: u32, memory: &[u8; MEMORY_SIZE]) -> PpuEvents {
        let mut events = PpuEvents::default();
        if !self.lcd_enabled() {
            return events;
        }

        let mut remaining = ticks;
        while remaining > 0 {
            let boundary = self.mode_end();
            let advance = remaining.min(boundary - self.line_ticks);
            self.line_ticks += advance;
            remaining -= advance;
            if self.line_ticks == boundary {
                self.advance_mode(memory, &mut events);
            }
        }
        events
    }

    /// Line tick at which the current mode ends.
    fn mode_end(&self) -> u32 {
        match self.mode {
            PpuMode::OamSearch => OAM_SEARCH_TICKS,
            PpuMode::PixelTransfer => OAM_SEARCH_TICKS + PIXEL_TRANSFER_TICKS,
            PpuMode::HBlank | PpuMode::VBlank => LINE_TICKS,
        }
    }

    fn advance_mode(&mut self, memory: &[u8; MEMORY_SIZE], events: &mut PpuEvents) {
        match self.mode {
            PpuMode::OamSearch => {
                self.snapshot_oam(memory);
                self.mode = PpuMode::PixelTransfer;
            }
            PpuMode::PixelTransfer => {
                self.render_line(memory);
                self.mode = PpuMode::HBlank;
            }
            PpuMode::HBlank => {
                self.line_ticks = 0;
                self.ly += 1;
                if self.ly == VISIBLE_LINES {
                    self.mode = PpuMode::VBlank;
                    events.interrupts |= InterruptFlags::VBLANK;
                    log::debug!("PPU: entering VBlank");
                } else {
                    self.mode = PpuMode::OamSearch;
                }
            }
            PpuMode::VBlank => {
                self.line_ticks = 0;
                self.ly += 1;
                if self.ly == TOTAL_LINES {
                    self.ly = 0;
                    self.start_frame();
                    self.mode = PpuMode::OamSearch;
                    events.frame = Some(self.frame.clone());
                    log::debug!("PPU: frame complete");
                }
            }
        }
        self.update_stat_line(&mut events.interrupts);
    }

    fn start_frame(&mut self) {
        self.window_start_line = self.wy;
        self.window_line = 0;
    }

    fn snapshot_oam(&mut self, memory: &[u8; MEMORY_SIZE]) {
        let table = &memory[OAM_START..OAM_START + OAM_ENTRIES * 4];
        for (entry, bytes) in self.oam.iter_mut().zip(table.chunks_exact(4)) {
            *entry = OamEntry::from_bytes(bytes);
        }
    }

    fn coincidence(&self) -> bool {
        self.ly == self.lyc
    }

    fn mode_stat_line(&self) -> bool {
        if !self.lcd_enabled() {
            return false;
        }
        let select = self.stat_select;
        (select.contains(StatSelect::HBLANK) && self.mode == PpuMode::HBlank)
            || (select.contains(StatSelect::VBLANK) && self.mode == PpuMode::VBlank)
            || (select.contains(StatSelect::OAM) && self.mode == PpuMode::OamSearch)
    }

    fn lyc_stat_line(&self) -> bool {
        self.lcd_enabled() && self.stat_select.contains(StatSelect::LYC) && self.coincidence()
    }

    /// Raise LCD_STAT when LY starts matching LYC with the LYC source
    /// enabled, or on a rising edge of the combined mode sources.
    fn update_stat_line(&mut self, interrupts: &mut InterruptFlags) {
        let mode_line = self.mode_stat_line();
        let lyc_line = self.lyc_stat_line();
        let mode_edge = mode_line && !self.stat_line;
        let lyc_edge = lyc_line && !self.lyc_line;
        if mode_edge || lyc_edge {
            *interrupts |= InterruptFlags::LCD_STAT;
            log::debug!(
                "PPU: STAT request (LY={} mode={:?} select={:?} lyc_match={})",
                self.ly,
                self.mode,
                self.stat_select,
                lyc_edge
            );
        }
        self.stat_line = mode_line;
        self.lyc_line = lyc_line;
    }

    pub fn read_register(&self, addr: u16) -> u8 {
        match addr {
            0xFF40 => self.lcdc.bits(),
            0xFF41 => {
                let mode = if self.lcd_enabled() { self.mode.bits() } else { 0 };
                0x80 | self.stat_select.bits() | (self.coincidence() as u8) << 2 | mode
            }
            0xFF42 => self.scy,
            0xFF43 => self.scx,
            0xFF44 => self.ly,
            0xFF45 => self.lyc,
            0xFF47 => self.bgp,
            0xFF48 => self.obp0,
            0xFF49 => self.obp1,
            0xFF4A => self.wy,
            0xFF4B => self.wx,
            _ => 0xFF,
        }
    }

    /// Write a PPU-owned register, returning any interrupt the write raised.
    ///
    /// Switching the LCD off anywhere but VBlank is refused with
    /// [`GbError::TimingViolation`] and leaves LCDC untouched.
    pub fn write_register(&mut self, addr: u16, value: u8) -> Result<InterruptFlags> {
        let mut interrupts = InterruptFlags::empty();
        match addr {
            0xFF40 => self.write_lcdc(value, &mut interrupts)?,
            0xFF41 => {
                self.stat_select = StatSelect::from_bits_truncate(value);
                self.update_stat_line(&mut interrupts);
            }
            0xFF42 => self.scy = value,
            0xFF43 => self.scx = value,
            // LY is read-only.
            0xFF44 => {}
            0xFF45 => {
                self.lyc = value;
                self.update_stat_line(&mut interrupts);
            }
            0xFF47 => self.bgp = value,
            0xFF48 => self.obp0 = value,
            0xFF49 => self.obp1 = value,
            0xFF4A => self.wy = value,
            0xFF4B => self.wx = value,
            _ => {}
        }
        Ok(interrupts)
    }

    fn write_lcdc(&mut self, value: u8, interrupts: &mut InterruptFlags) -> Result<()> {
        let new = Lcdc::from_bits_retain(value);
        let was_on = self.lcd_enabled();
        let turning_on = new.contains(Lcdc::LCD_ENABLE);

        if was_on && !turning_on {
            if self.mode != PpuMode::VBlank {
                log::warn!(
                    "LCD switched off outside VBlank (LY={} mode={:?}); write rejected",
                    self.ly,
                    self.mode
                );
                return Err(GbError::TimingViolation {
                    register: "LCDC",
                    line: self.ly,
                    mode: self.mode,
                });
            }
            log::debug!("PPU: display off");
            self.lcdc = new;
            self.ly = 0;
            self.line_ticks = 0;
            self.mode = PpuMode::HBlank;
            self.stat_line = false;
            self.lyc_line = false;
            self.frame.clear();
            return Ok(());
        }

        self.lcdc = new;
        if !was_on && turning_on {
            log::debug!("PPU: display on");
            self.ly = 0;
            self.line_ticks = 0;
            self.mode = PpuMode::OamSearch;
            self.start_frame();
            self.update_stat_line(interrupts);
        }
        Ok(())
    }

}
