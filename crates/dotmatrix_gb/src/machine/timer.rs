//! Timer / divider unit.
//!
//! A free-running 16-bit counter advances once per tick; DIV exposes its
//! upper byte. TIMA counts falling edges of one counter bit selected by
//! TAC, so anything that drops that bit (a DIV reset, a TAC change) can
//! bump TIMA as well.

use super::{InterruptFlags, Peripheral};

/// Counter value left behind by the DMG boot ROM (DIV reads 0xAB).
const DMG_COUNTER_SEED: u16 = 0xABCC;
/// Ticks between a TIMA overflow and the TMA reload.
const RELOAD_DELAY: u8 = 4;

pub(crate) struct Timer {
    counter: u16,
    tima: u8,
    tma: u8,
    /// TAC, lower 3 bits.
    tac: u8,
    /// Ticks left until an overflowed TIMA is reloaded; 0 when idle.
    reload_in: u8,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub(crate) fn new() -> Self {
        Self {
            counter: DMG_COUNTER_SEED,
            tima: 0,
            tma: 0,
            tac: 0,
            reload_in: 0,
        }
    }

    /// Counter bit feeding TIMA:
    /// - 00 → bit 9 (4096 Hz)
    /// - 01 → bit 3 (262144 Hz)
    /// - 10 → bit 5 (65536 Hz)
    /// - 11 → bit 7 (16384 Hz)
    #[inline]
    fn input_mask(&self) -> u16 {
        match self.tac & 0x03 {
            0x00 => 1 << 9,
            0x01 => 1 << 3,
            0x02 => 1 << 5,
            _ => 1 << 7,
        }
    }

    #[inline]
    fn input_bit(&self) -> bool {
        self.tac & 0x04 != 0 && self.counter & self.input_mask() != 0
    }

    fn increment_tima(&mut self) {
        let (next, overflow) = self.tima.overflowing_add(1);
        self.tima = next;
        if overflow {
            // TIMA reads 0x00 until the reload lands.
            self.reload_in = RELOAD_DELAY;
        }
    }

    /// Advance by one tick, returning true when the timer interrupt fires.
    fn tick_once(&mut self) -> bool {
        let mut fired = false;
        if self.reload_in > 0 {
            self.reload_in -= 1;
            if self.reload_in == 0 {
                self.tima = self.tma;
                fired = true;
            }
        }

        let before = self.input_bit();
        self.counter = self.counter.wrapping_add(1);
        if before && !self.input_bit() {
            self.increment_tima();
        }
        fired
    }

    fn write_div(&mut self) {
        let before = self.input_bit();
        self.counter = 0;
        if before {
            self.increment_tima();
        }
    }

    fn write_tac(&mut self, value: u8) {
        let before = self.input_bit();
        self.tac = value & 0x07;
        if before && !self.input_bit() {
            self.increment_tima();
        }
    }
}

impl Peripheral for Timer {
    fn tick(&mut self, ticks: u32) -> InterruptFlags {
        let mut requested = InterruptFlags::empty();
        for _ in 0..ticks {
            if self.tick_once() {
                requested |= InterruptFlags::TIMER;
            }
        }
        requested
    }

    fn handles(&self, addr: u16) -> bool {
        (0xFF04..=0xFF07).contains(&addr)
    }

    fn read_register(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF04 => (self.counter >> 8) as u8,
            0xFF05 => self.tima,
            0xFF06 => self.tma,
            0xFF07 => self.tac | 0xF8,
            _ => 0xFF,
        }
    }

    fn write_register(&mut self, addr: u16, value: u8) -> InterruptFlags {
        match addr {
            0xFF04 => self.write_div(),
            0xFF05 => {
                // A write inside the reload window cancels the reload.
                self.tima = value;
                self.reload_in = 0;
            }
            0xFF06 => self.tma = value,
            0xFF07 => self.write_tac(value),
            _ => {}
        }
        InterruptFlags::empty()
    }
}
