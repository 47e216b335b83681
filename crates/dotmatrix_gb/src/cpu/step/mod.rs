use super::{Bus, Cpu, OpInfo, BASE_OPS, CB_OPS, IDLE_TICKS};
use crate::{GbError, Result};

impl Cpu {
    /// Execute one instruction and return the T-cycles it took.
    ///
    /// In order: a locked core repeats its error; STOP idles until a joypad
    /// line goes low; HALT idles until an enabled interrupt is requested;
    /// an interrupt is dispatched if IME allows; otherwise the next
    /// instruction is fetched, decoded through the descriptor tables and
    /// executed.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        if let Some((addr, opcode)) = self.locked {
            return Err(GbError::InvalidOpcode { addr, opcode });
        }
        self.jumped = false;

        if self.stopped {
            if bus.read8(0xFF00) & 0x0F == 0x0F {
                return Ok(IDLE_TICKS);
            }
            log::debug!("leaving STOP at pc=0x{:04X}", self.regs.pc);
            self.stopped = false;
        }

        if self.halted {
            if bus.interrupts().pending().is_none() {
                return Ok(IDLE_TICKS);
            }
            self.halted = false;
        }

        if let Some(ticks) = self.service_interrupt(bus)? {
            return Ok(ticks);
        }

        let pc = self.regs.pc;
        let opcode = self.fetch8(bus);
        let info: OpInfo = if opcode == 0xCB {
            CB_OPS[self.fetch8(bus) as usize]
        } else {
            BASE_OPS[opcode as usize]
        };

        let imm = match info.operand_bytes {
            0 => 0,
            1 => self.fetch8(bus) as u16,
            _ => self.fetch16(bus),
        };
        log::trace!("0x{:04X}: {} (imm=0x{:04X})", pc, info, imm);

        let taken = self.execute(bus, pc, opcode, info.op, imm)?;
        self.apply_ime_delay(bus);

        let mut ticks = info.ticks as u32;
        if taken {
            ticks += info.taken_ticks as u32;
        }
        Ok(ticks)
    }

    /// Park the core on an opcode it cannot execute; every later step
    /// reports the same error.
    pub(super) fn lock(&mut self, addr: u16, opcode: u8) -> GbError {
        log::error!("invalid opcode 0x{:02X} at 0x{:04X}; CPU locked", opcode, addr);
        self.locked = Some((addr, opcode));
        GbError::InvalidOpcode { addr, opcode }
    }
}
