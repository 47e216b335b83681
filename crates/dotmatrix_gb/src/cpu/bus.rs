use crate::machine::InterruptController;
use crate::Result;

/// What the CPU sees of the machine: a 16-bit address space and the
/// interrupt controller.
///
/// Reads never fail; a blocked or unmapped location simply reads back as
/// `0xFF`. Writes can be rejected by a peripheral, in which case the error
/// aborts the current instruction.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8) -> Result<()>;

    fn interrupts(&self) -> &InterruptController;
    fn interrupts_mut(&mut self) -> &mut InterruptController;
}
