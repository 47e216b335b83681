use crate::cpu::{Bus, Cpu, Operand};
use crate::Result;

impl Cpu {
    pub(super) fn exec_inc<B: Bus>(&mut self, bus: &mut B, target: Operand) -> Result<()> {
        let value = self.read_operand(bus, target);
        let result = self.alu_inc8(value);
        self.write_operand(bus, target, result)
    }

    pub(super) fn exec_dec<B: Bus>(&mut self, bus: &mut B, target: Operand) -> Result<()> {
        let value = self.read_operand(bus, target);
        let result = self.alu_dec8(value);
        self.write_operand(bus, target, result)
    }
}
