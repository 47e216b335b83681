use super::{Bus, Cond, Cpu, Flag, Indirect, Operand, Reg16, StackPair};
use crate::Result;

impl Cpu {
    #[inline]
    pub(super) fn read_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand) -> u8 {
        match operand {
            Operand::B => self.regs.b,
            Operand::C => self.regs.c,
            Operand::D => self.regs.d,
            Operand::E => self.regs.e,
            Operand::H => self.regs.h,
            Operand::L => self.regs.l,
            Operand::HlInd => bus.read8(self.regs.hl()),
            Operand::A => self.regs.a,
        }
    }

    #[inline]
    pub(super) fn write_operand<B: Bus>(
        &mut self,
        bus: &mut B,
        operand: Operand,
        value: u8,
    ) -> Result<()> {
        match operand {
            Operand::B => self.regs.b = value,
            Operand::C => self.regs.c = value,
            Operand::D => self.regs.d = value,
            Operand::E => self.regs.e = value,
            Operand::H => self.regs.h = value,
            Operand::L => self.regs.l = value,
            Operand::HlInd => bus.write8(self.regs.hl(), value)?,
            Operand::A => self.regs.a = value,
        }
        Ok(())
    }

    pub(super) fn read_pair(&self, pair: Reg16) -> u16 {
        match pair {
            Reg16::BC => self.regs.bc(),
            Reg16::DE => self.regs.de(),
            Reg16::HL => self.regs.hl(),
            Reg16::SP => self.regs.sp,
        }
    }

    pub(super) fn write_pair(&mut self, pair: Reg16, value: u16) {
        match pair {
            Reg16::BC => self.regs.set_bc(value),
            Reg16::DE => self.regs.set_de(value),
            Reg16::HL => self.regs.set_hl(value),
            Reg16::SP => self.regs.sp = value,
        }
    }

    pub(super) fn read_stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::BC => self.regs.bc(),
            StackPair::DE => self.regs.de(),
            StackPair::HL => self.regs.hl(),
            StackPair::AF => self.regs.af(),
        }
    }

    pub(super) fn write_stack_pair(&mut self, pair: StackPair, value: u16) {
        match pair {
            StackPair::BC => self.regs.set_bc(value),
            StackPair::DE => self.regs.set_de(value),
            StackPair::HL => self.regs.set_hl(value),
            StackPair::AF => self.regs.set_af(value),
        }
    }

    /// Resolve `(BC)`, `(DE)`, `(HL+)` or `(HL-)`, applying the HL
    /// post-increment/decrement.
    pub(super) fn indirect_addr(&mut self, indirect: Indirect) -> u16 {
        match indirect {
            Indirect::BC => self.regs.bc(),
            Indirect::DE => self.regs.de(),
            Indirect::HlInc => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Indirect::HlDec => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn condition(&self, cond: Option<Cond>) -> bool {
        match cond {
            None => true,
            Some(Cond::NZ) => !self.get_flag(Flag::Z),
            Some(Cond::Z) => self.get_flag(Flag::Z),
            Some(Cond::NC) => !self.get_flag(Flag::C),
            Some(Cond::C) => self.get_flag(Flag::C),
        }
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        if self.halt_bug {
            // The fetch right after a buggy HALT reads the byte but leaves
            // PC where it was, so the byte is read twice.
            self.halt_bug = false;
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(1);
        }
        value
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Push high byte first so that memory[SP] holds the low byte.
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) -> Result<()> {
        let [lo, hi] = value.to_le_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi)?;
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo)
    }

    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.regs.sp);
        let hi = bus.read8(self.regs.sp.wrapping_add(1));
        self.regs.sp = self.regs.sp.wrapping_add(2);
        u16::from_le_bytes([lo, hi])
    }

    /// Redirect PC and remember that control flow changed this step.
    #[inline]
    pub(super) fn jump_to(&mut self, addr: u16) {
        self.regs.pc = addr;
        self.jumped = true;
    }
}
