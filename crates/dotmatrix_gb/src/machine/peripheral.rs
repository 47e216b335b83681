use super::InterruptFlags;

/// Anything that runs off the machine clock alongside the PPU.
///
/// The bus hands every peripheral the exact tick count of each CPU step and
/// folds the returned flags into IF. Register hooks are optional; an
/// external unit such as an APU claims its I/O range through [`handles`].
///
/// [`handles`]: Peripheral::handles
pub trait Peripheral {
    fn tick(&mut self, ticks: u32) -> InterruptFlags;

    fn handles(&self, _addr: u16) -> bool {
        false
    }

    fn read_register(&mut self, _addr: u16) -> u8 {
        0xFF
    }

    fn write_register(&mut self, _addr: u16, _value: u8) -> InterruptFlags {
        InterruptFlags::empty()
    }
}
