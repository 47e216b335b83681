use crate::cpu::{Bus, Cond, Cpu};
use crate::Result;

impl Cpu {
    /// The displacement is relative to the address after the operand.
    pub(super) fn exec_jr(&mut self, cond: Option<Cond>, offset: u8) -> bool {
        if !self.condition(cond) {
            return false;
        }
        let target = self.regs.pc.wrapping_add(offset as i8 as u16);
        self.jump_to(target);
        cond.is_some()
    }

    pub(super) fn exec_jp(&mut self, cond: Option<Cond>, addr: u16) -> bool {
        if !self.condition(cond) {
            return false;
        }
        self.jump_to(addr);
        cond.is_some()
    }

    pub(super) fn exec_call<B: Bus>(
        &mut self,
        bus: &mut B,
        cond: Option<Cond>,
        addr: u16,
    ) -> Result<bool> {
        if !self.condition(cond) {
            return Ok(false);
        }
        self.push_u16(bus, self.regs.pc)?;
        self.jump_to(addr);
        Ok(cond.is_some())
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B, cond: Option<Cond>) -> bool {
        if !self.condition(cond) {
            return false;
        }
        let addr = self.pop_u16(bus);
        self.jump_to(addr);
        cond.is_some()
    }
}
