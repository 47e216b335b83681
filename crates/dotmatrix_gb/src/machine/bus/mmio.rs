use super::GameBoyBus;
use crate::machine::{InterruptFlags, Peripheral};
use crate::Result;

/// Side effects of a register write, applied by the bus once the owning
/// device has accepted the value.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct WriteEffects {
    pub(super) interrupts: InterruptFlags,
    /// OAM DMA source page.
    pub(super) dma: Option<u8>,
}

impl WriteEffects {
    pub(super) fn request(interrupts: InterruptFlags) -> Self {
        Self {
            interrupts,
            dma: None,
        }
    }
}

#[inline]
fn is_ppu_register(addr: u16) -> bool {
    matches!(addr, 0xFF40..=0xFF45 | 0xFF47..=0xFF4B)
}

impl GameBoyBus {
    pub(super) fn read8_mmio(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => match &self.cartridge {
                Some(cart) => cart.read_byte(addr),
                None => self.memory[addr as usize],
            },
            0x8000..=0x9FFF => {
                if self.ppu.vram_accessible() {
                    self.memory[addr as usize]
                } else {
                    0xFF
                }
            }
            // Echo of C000-DDFF.
            0xE000..=0xFDFF => self.memory[(addr - 0x2000) as usize],
            0xFE00..=0xFE9F => {
                if self.ppu.oam_accessible() {
                    self.memory[addr as usize]
                } else {
                    0xFF
                }
            }
            0xFEA0..=0xFEFF => 0xFF,
            0xFF00..=0xFF7F => self.read_io(addr),
            0xFFFF => self.interrupts.read_ie(),
            _ => self.memory[addr as usize],
        }
    }

    fn read_io(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF00 => self.joypad.read(),
            0xFF01 | 0xFF02 => self.serial.read_register(addr),
            0xFF04..=0xFF07 => self.timer.read_register(addr),
            0xFF0F => self.interrupts.read_if(),
            _ if is_ppu_register(addr) => self.ppu.read_register(addr),
            _ => match self.peripherals.iter_mut().find(|p| p.handles(addr)) {
                Some(peripheral) => peripheral.read_register(addr),
                None => self.memory[addr as usize],
            },
        }
    }

    pub(super) fn write8_mmio(&mut self, addr: u16, value: u8) -> Result<()> {
        let effects = self.dispatch_write(addr, value)?;
        self.apply_effects(effects);
        Ok(())
    }

    /// Route a write to whoever owns `addr`.
    ///
    /// Blocked VRAM/OAM writes and writes to the unusable range are
    /// dropped. A register that refuses the value fails the write.
    fn dispatch_write(&mut self, addr: u16, value: u8) -> Result<WriteEffects> {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => match &mut self.cartridge {
                Some(cart) => cart.write_byte(addr, value),
                None => self.memory[addr as usize] = value,
            },
            0x8000..=0x9FFF => {
                if self.ppu.vram_accessible() {
                    self.memory[addr as usize] = value;
                }
            }
            0xE000..=0xFDFF => self.memory[(addr - 0x2000) as usize] = value,
            0xFE00..=0xFE9F => {
                if self.ppu.oam_accessible() {
                    self.memory[addr as usize] = value;
                }
            }
            0xFEA0..=0xFEFF => {}
            0xFF00..=0xFF7F => return self.write_io(addr, value),
            0xFFFF => self.interrupts.write_ie(value),
            _ => self.memory[addr as usize] = value,
        }
        Ok(WriteEffects::default())
    }

    fn write_io(&mut self, addr: u16, value: u8) -> Result<WriteEffects> {
        let effects = match addr {
            0xFF00 => {
                self.joypad.write(value);
                WriteEffects::default()
            }
            0xFF01 | 0xFF02 => WriteEffects::request(self.serial.write_register(addr, value)),
            0xFF04..=0xFF07 => WriteEffects::request(self.timer.write_register(addr, value)),
            0xFF0F => {
                self.interrupts.write_if(value);
                WriteEffects::default()
            }
            0xFF46 => WriteEffects {
                interrupts: InterruptFlags::empty(),
                dma: Some(value),
            },
            _ if is_ppu_register(addr) => {
                WriteEffects::request(self.ppu.write_register(addr, value)?)
            }
            _ => match self.peripherals.iter_mut().find(|p| p.handles(addr)) {
                Some(peripheral) => WriteEffects::request(peripheral.write_register(addr, value)),
                None => {
                    self.memory[addr as usize] = value;
                    WriteEffects::default()
                }
            },
        };
        Ok(effects)
    }

    pub(super) fn apply_effects(&mut self, effects: WriteEffects) {
        self.interrupts.request_flags(effects.interrupts);
        if let Some(page) = effects.dma {
            self.do_oam_dma(page);
        }
    }
}
