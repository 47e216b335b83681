use crate::cpu::{Bus, Cpu, Operand};
use crate::Result;

impl Cpu {
    pub(super) fn exec_ld<B: Bus>(&mut self, bus: &mut B, dst: Operand, src: Operand) -> Result<()> {
        let value = self.read_operand(bus, src);
        self.write_operand(bus, dst, value)
    }

    /// `LD (a16),SP` stores SP little-endian.
    pub(super) fn exec_store_sp<B: Bus>(&mut self, bus: &mut B, addr: u16) -> Result<()> {
        let [lo, hi] = self.regs.sp.to_le_bytes();
        bus.write8(addr, lo)?;
        bus.write8(addr.wrapping_add(1), hi)
    }
}
