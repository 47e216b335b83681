use super::{Bus, Cpu, Operand, Shift};
use crate::Result;

// `CB`-page operations: rotates, shifts, swaps and single-bit
// test/reset/set.
impl Cpu {
    pub(super) fn exec_shift<B: Bus>(
        &mut self,
        bus: &mut B,
        shift: Shift,
        target: Operand,
    ) -> Result<()> {
        let value = self.read_operand(bus, target);
        let result = self.alu_shift(shift, value);
        self.write_operand(bus, target, result)
    }

    pub(super) fn exec_bit<B: Bus>(&mut self, bus: &mut B, bit: u8, target: Operand) {
        let value = self.read_operand(bus, target);
        self.alu_bit(bit, value);
    }

    pub(super) fn exec_res<B: Bus>(
        &mut self,
        bus: &mut B,
        bit: u8,
        target: Operand,
    ) -> Result<()> {
        let value = self.read_operand(bus, target);
        self.write_operand(bus, target, value & !(1 << bit))
    }

    pub(super) fn exec_set<B: Bus>(
        &mut self,
        bus: &mut B,
        bit: u8,
        target: Operand,
    ) -> Result<()> {
        let value = self.read_operand(bus, target);
        self.write_operand(bus, target, value | (1 << bit))
    }
}
