use thiserror::Error;

use crate::machine::PpuMode;

/// Fatal conditions raised by the emulator core.
///
/// None of these are retried: every operation in the core is deterministic,
/// so an error ends the current run and is reported to the control surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GbError {
    /// The CPU decoded one of the removed opcodes (D3, DB, DD, E3, E4, EB,
    /// EC, ED, F4, FC, FD) or a bare `CB` prefix reached the executor.
    #[error("invalid opcode 0x{opcode:02X} at 0x{addr:04X}")]
    InvalidOpcode { addr: u16, opcode: u8 },

    /// A register write that real hardware cannot survive, such as switching
    /// the LCD off outside of VBlank. The write is rejected.
    #[error("timing violation: write to {register} on line {line} during {mode:?}")]
    TimingViolation {
        register: &'static str,
        line: u8,
        mode: PpuMode,
    },

    /// A bulk memory access ran past the end of the 64 KiB address space.
    #[error("access of {len} bytes at 0x{addr:04X} runs past the address space")]
    OutOfRangeAccess { addr: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, GbError>;
