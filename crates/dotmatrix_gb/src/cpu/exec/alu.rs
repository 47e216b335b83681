use crate::cpu::{Cpu, Flag, Shift};

impl Cpu {
    /// RLCA/RRCA/RLA/RRA: like their `CB` counterparts but Z is always
    /// cleared.
    pub(super) fn exec_rotate_a(&mut self, shift: Shift) {
        self.regs.a = self.alu_shift(shift, self.regs.a);
        self.set_flag(Flag::Z, false);
    }

    pub(super) fn exec_cpl(&mut self) {
        self.regs.a = !self.regs.a;
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
    }

    pub(super) fn exec_scf(&mut self) {
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, true);
    }

    pub(super) fn exec_ccf(&mut self) {
        let carry = self.get_flag(Flag::C);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, !carry);
    }
}
