use super::{InterruptFlags, Peripheral};

/// Eight bits at 8192 Hz.
const TRANSFER_TICKS: u32 = 8 * 512;

/// Serial port with no link partner attached.
///
/// Only internally clocked transfers progress. Every byte shifted out is
/// captured in `output`, which is how test ROMs report their results.
#[derive(Default)]
pub(crate) struct Serial {
    sb: u8,
    /// SC bits 7 (transfer) and 0 (clock select).
    sc: u8,
    outgoing: u8,
    remaining: u32,
    pub(crate) output: Vec<u8>,
}

impl Serial {
    fn write_sc(&mut self, value: u8) {
        self.sc = value & 0x81;
        if self.sc == 0x81 {
            self.outgoing = self.sb;
            self.remaining = TRANSFER_TICKS;
        } else {
            // Externally clocked or cancelled; nothing will ever shift.
            self.remaining = 0;
        }
    }

    fn finish_transfer(&mut self) {
        self.output.push(self.outgoing);
        log::trace!("serial: sent 0x{:02X}", self.outgoing);
        // Disconnected line shifts in 1s.
        self.sb = 0xFF;
        self.sc &= !0x80;
    }
}

impl Peripheral for Serial {
    fn tick(&mut self, ticks: u32) -> InterruptFlags {
        if self.remaining == 0 {
            return InterruptFlags::empty();
        }
        self.remaining = self.remaining.saturating_sub(ticks);
        if self.remaining > 0 {
            return InterruptFlags::empty();
        }
        self.finish_transfer();
        InterruptFlags::SERIAL
    }

    fn handles(&self, addr: u16) -> bool {
        matches!(addr, 0xFF01 | 0xFF02)
    }

    fn read_register(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF01 => self.sb,
            0xFF02 => 0x7E | self.sc,
            _ => 0xFF,
        }
    }

    fn write_register(&mut self, addr: u16, value: u8) -> InterruptFlags {
        match addr {
            0xFF01 => self.sb = value,
            0xFF02 => self.write_sc(value),
            _ => {}
        }
        InterruptFlags::empty()
    }
}
