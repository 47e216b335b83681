use super::{Cpu, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            halted: false,
            stopped: false,
            halt_bug: false,
            ime_enable_pending: false,
            ime_enable_delay: false,
            locked: None,
            jumped: false,
        };
        cpu.apply_dmg_boot_state();
        cpu
    }

    /// Return to the state the boot ROM leaves behind.
    ///
    /// IME lives in the interrupt controller and is reset with the bus.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Register values handed to cartridge code at 0x0100 on a DMG.
    fn apply_dmg_boot_state(&mut self) {
        self.regs = Registers {
            a: 0x01,
            f: 0xB0,
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            sp: 0xFFFE,
            pc: 0x0100,
        };
    }
}
