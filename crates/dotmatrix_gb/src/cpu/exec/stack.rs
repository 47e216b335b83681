use crate::cpu::{Bus, Cpu};
use crate::Result;

impl Cpu {
    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, vector: u8) -> Result<()> {
        self.push_u16(bus, self.regs.pc)?;
        self.jump_to(vector as u16);
        Ok(())
    }

    /// RETI re-enables interrupts immediately, without the EI delay.
    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.pop_u16(bus);
        self.jump_to(addr);
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        bus.interrupts_mut().enable_master();
    }
}
