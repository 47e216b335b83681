/// Cartridge ROM ($0000-$7FFF) and external RAM ($A000-$BFFF).
///
/// The bus forwards both windows here once a cartridge is inserted.
/// Mappers with banking hook their control registers into `write_byte`.
pub trait Cartridge {
    fn read_byte(&self, addr: u16) -> u8;
    fn write_byte(&mut self, addr: u16, value: u8);

    fn title(&self) -> String {
        String::new()
    }
}

const TITLE_RANGE: std::ops::Range<usize> = 0x0134..0x0144;
const TYPE_ADDR: usize = 0x0147;
const RAM_SIZE: usize = 0x2000;

/// 32 KiB ROM with an optional 8 KiB RAM and no banking.
pub struct RomOnly {
    rom: Vec<u8>,
    ram: Vec<u8>,
}

impl RomOnly {
    pub fn new(rom: &[u8]) -> Self {
        Self {
            rom: rom.to_vec(),
            ram: vec![0; RAM_SIZE],
        }
    }
}

impl Cartridge for RomOnly {
    fn read_byte(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.rom.get(addr as usize).copied().unwrap_or(0xFF),
            0xA000..=0xBFFF => self.ram[(addr - 0xA000) as usize],
            _ => 0xFF,
        }
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        // ROM writes would be mapper commands; there is no mapper.
        if let 0xA000..=0xBFFF = addr {
            self.ram[(addr - 0xA000) as usize] = value;
        }
    }

    fn title(&self) -> String {
        let Some(bytes) = self.rom.get(TITLE_RANGE) else {
            return String::new();
        };
        bytes
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
            .collect()
    }
}

/// Build a cartridge for `rom` from its header.
///
/// Only unbanked images are supported; anything else is loaded as ROM-only
/// so that at least its first 32 KiB can run.
pub(crate) fn from_rom(rom: &[u8]) -> Box<dyn Cartridge> {
    let cart_type = rom.get(TYPE_ADDR).copied().unwrap_or(0);
    if !matches!(cart_type, 0x00 | 0x08 | 0x09) {
        log::warn!(
            "unsupported cartridge type 0x{:02X}; loading as ROM only",
            cart_type
        );
    }
    if rom.len() > 0x8000 {
        log::warn!(
            "ROM is {} bytes; only the first 32 KiB are mapped",
            rom.len()
        );
    }
    Box::new(RomOnly::new(rom))
}
