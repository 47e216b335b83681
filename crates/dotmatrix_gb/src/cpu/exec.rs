mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu, Op};
use crate::Result;

impl Cpu {
    /// Carry out `op`, fetched as `opcode` at `at`, with its already-fetched
    /// immediate.
    ///
    /// Returns whether a conditional branch was taken, so the caller can
    /// add the descriptor's penalty. Holes in the opcode map lock the core.
    pub(super) fn execute<B: Bus>(
        &mut self,
        bus: &mut B,
        at: u16,
        opcode: u8,
        op: Op,
        imm: u16,
    ) -> Result<bool> {
        match op {
            Op::Nop => {}
            Op::Stop => self.exec_stop(),
            Op::Halt => self.exec_halt(bus),
            Op::Di => self.exec_di(bus),
            Op::Ei => self.exec_ei(),
            Op::Daa => self.alu_daa(),
            Op::Cpl => self.exec_cpl(),
            Op::Scf => self.exec_scf(),
            Op::Ccf => self.exec_ccf(),

            Op::Ld(dst, src) => self.exec_ld(bus, dst, src)?,
            Op::LdImm(dst) => self.write_operand(bus, dst, imm as u8)?,
            Op::LdPairImm(pair) => self.write_pair(pair, imm),
            Op::StoreA(ind) => {
                let addr = self.indirect_addr(ind);
                bus.write8(addr, self.regs.a)?;
            }
            Op::LoadA(ind) => {
                let addr = self.indirect_addr(ind);
                self.regs.a = bus.read8(addr);
            }
            Op::StoreSp => self.exec_store_sp(bus, imm)?,
            Op::StoreHigh => bus.write8(0xFF00 | imm, self.regs.a)?,
            Op::LoadHigh => self.regs.a = bus.read8(0xFF00 | imm),
            Op::StoreHighC => bus.write8(0xFF00 | self.regs.c as u16, self.regs.a)?,
            Op::LoadHighC => self.regs.a = bus.read8(0xFF00 | self.regs.c as u16),
            Op::StoreAbs => bus.write8(imm, self.regs.a)?,
            Op::LoadAbs => self.regs.a = bus.read8(imm),
            Op::LdSpHl => self.regs.sp = self.regs.hl(),
            Op::LdHlSpOffset => {
                let value = self.alu_add16_signed(self.regs.sp, imm as u8);
                self.regs.set_hl(value);
            }
            Op::AddSpOffset => self.regs.sp = self.alu_add16_signed(self.regs.sp, imm as u8),

            Op::Inc(target) => self.exec_inc(bus, target)?,
            Op::Dec(target) => self.exec_dec(bus, target)?,
            Op::IncPair(pair) => self.write_pair(pair, self.read_pair(pair).wrapping_add(1)),
            Op::DecPair(pair) => self.write_pair(pair, self.read_pair(pair).wrapping_sub(1)),
            Op::AddHl(pair) => self.alu_add16_hl(self.read_pair(pair)),
            Op::Alu(alu, src) => {
                let value = self.read_operand(bus, src);
                self.alu(alu, value);
            }
            Op::AluImm(alu) => self.alu(alu, imm as u8),
            Op::RotateA(shift) => self.exec_rotate_a(shift),

            Op::Jr(cond) => return Ok(self.exec_jr(cond, imm as u8)),
            Op::Jp(cond) => return Ok(self.exec_jp(cond, imm)),
            Op::JpHl => self.jump_to(self.regs.hl()),
            Op::Call(cond) => return self.exec_call(bus, cond, imm),
            Op::Ret(cond) => return Ok(self.exec_ret(bus, cond)),
            Op::Reti => self.exec_reti(bus),
            Op::Rst(vector) => self.exec_rst(bus, vector)?,
            Op::Push(pair) => self.push_u16(bus, self.read_stack_pair(pair))?,
            Op::Pop(pair) => {
                let value = self.pop_u16(bus);
                self.write_stack_pair(pair, value);
            }

            Op::Shift(shift, target) => self.exec_shift(bus, shift, target)?,
            Op::Bit(bit, target) => self.exec_bit(bus, bit, target),
            Op::Res(bit, target) => self.exec_res(bus, bit, target)?,
            Op::Set(bit, target) => self.exec_set(bus, bit, target)?,

            // 0xCB is consumed by the fetch, so a bare prefix is a decode hole too.
            Op::Prefix | Op::Invalid => return Err(self.lock(at, opcode)),
        }
        Ok(false)
    }
}
