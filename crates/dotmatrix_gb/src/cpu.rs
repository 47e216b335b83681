//! Sharp LR35902 instruction engine.
//!
//! `Cpu::step` runs exactly one instruction (or one interrupt entry, or one
//! idle HALT/STOP slice) against a [`Bus`] and reports how many T-cycles it
//! took. Advancing the rest of the machine by that amount is the caller's
//! job; see `machine::GameBoy::step`.

mod alu;
mod bus;
mod cb;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;
mod table;

pub use bus::Bus;
pub use regs::{Flag, Registers};
pub use table::{
    AluOp, Cond, Indirect, Op, OpInfo, Operand, Reg16, Shift, StackPair, BASE_OPS, CB_OPS,
};

#[cfg(test)]
mod tests;

/// Tick cost of an idle HALT or STOP step.
pub const IDLE_TICKS: u32 = 4;
/// Tick cost of dispatching to an interrupt vector.
pub const INTERRUPT_TICKS: u32 = 20;

#[derive(Debug)]
pub struct Cpu {
    pub regs: Registers,
    halted: bool,
    stopped: bool,
    /// Set by HALT when IME is clear and an interrupt is already pending.
    /// The next opcode fetch then fails to advance PC.
    halt_bug: bool,
    /// EI takes effect after the following instruction.
    ime_enable_pending: bool,
    ime_enable_delay: bool,
    /// Address and opcode of the invalid instruction that locked the core.
    locked: Option<(u16, u8)>,
    /// Whether the last step redirected PC (jump, call, return, restart or
    /// interrupt dispatch).
    jumped: bool,
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        (self.regs.f & (1 << flag as u8)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let mask = 1 << flag as u8;
        if value {
            self.regs.f |= mask;
        } else {
            self.regs.f &= !mask;
        }
        self.regs.f &= 0xF0;
    }

    #[inline]
    fn clear_flags(&mut self) {
        self.regs.f = 0;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    pub fn jumped(&self) -> bool {
        self.jumped
    }
}
