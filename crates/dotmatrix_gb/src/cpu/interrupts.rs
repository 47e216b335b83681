use super::{Bus, Cpu, INTERRUPT_TICKS};
use crate::Result;

impl Cpu {
    /// Enter the highest-priority pending interrupt if IME allows it.
    ///
    /// Returns the tick cost when an interrupt was dispatched.
    pub(super) fn service_interrupt<B: Bus>(&mut self, bus: &mut B) -> Result<Option<u32>> {
        let interrupts = bus.interrupts();
        if !interrupts.master_enabled() {
            return Ok(None);
        }
        let Some(interrupt) = interrupts.pending() else {
            return Ok(None);
        };

        let controller = bus.interrupts_mut();
        controller.disable_master();
        controller.acknowledge(interrupt);
        self.halted = false;

        let pc = self.regs.pc;
        self.push_u16(bus, pc)?;
        self.jump_to(interrupt.vector());

        log::debug!(
            "interrupt {:?}: pc=0x{:04X} -> 0x{:04X} sp=0x{:04X}",
            interrupt,
            pc,
            interrupt.vector(),
            self.regs.sp
        );
        Ok(Some(INTERRUPT_TICKS))
    }

    /// Advance the EI delay by one instruction.
    pub(super) fn apply_ime_delay<B: Bus>(&mut self, bus: &mut B) {
        if self.ime_enable_delay {
            self.ime_enable_delay = false;
            bus.interrupts_mut().enable_master();
        } else if self.ime_enable_pending {
            self.ime_enable_pending = false;
            self.ime_enable_delay = true;
        }
    }
}
