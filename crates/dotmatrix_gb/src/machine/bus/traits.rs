use crate::cpu::Bus;
use crate::machine::InterruptController;
use crate::Result;

use super::GameBoyBus;

impl Bus for GameBoyBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.breakpoints.note_read(addr);
        self.read8_mmio(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) -> Result<()> {
        self.breakpoints.note_write(addr);
        self.write8_mmio(addr, value)
    }

    fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }
}
