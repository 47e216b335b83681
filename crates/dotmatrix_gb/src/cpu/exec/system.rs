use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// The padding byte has already been consumed as the immediate.
    /// The core idles until a joypad line goes low; see `step`.
    pub(super) fn exec_stop(&mut self) {
        self.stopped = true;
        self.halted = false;
    }

    /// With IME set, or nothing pending, the CPU sleeps until an enabled
    /// interrupt is requested. With IME clear and an interrupt already
    /// pending it does not sleep at all and the next fetch repeats a byte.
    pub(super) fn exec_halt<B: Bus>(&mut self, bus: &mut B) {
        let interrupts = bus.interrupts();
        let ime = interrupts.master_enabled() || self.ime_enable_delay;
        if !ime && interrupts.pending().is_some() {
            self.halt_bug = true;
        } else {
            self.halted = true;
        }
    }

    pub(super) fn exec_di<B: Bus>(&mut self, bus: &mut B) {
        bus.interrupts_mut().disable_master();
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
    }

    pub(super) fn exec_ei(&mut self) {
        self.ime_enable_pending = true;
    }
}
