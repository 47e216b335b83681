use super::GameBoyBus;

/// xorshift32 seed for power-on RAM contents.
const RAM_SEED: u32 = 0xC0DE_1234;

impl GameBoyBus {
    /// Put the I/O space into the state the DMG boot ROM leaves behind at
    /// PC=0x0100. PPU, timer, serial and joypad start from their own
    /// power-on values.
    pub(super) fn apply_dmg_initial_io_state(&mut self, randomize_ram: bool) {
        if randomize_ram {
            self.randomize_internal_ram();
        }

        // The boot ROM exits with a VBlank request still latched.
        self.interrupts.write_if(0x01);
        self.interrupts.write_ie(0x00);

        // Sound registers. There is no APU in the core, but software can
        // still observe these values.
        const SOUND_DEFAULTS: [(usize, u8); 21] = [
            (0xFF10, 0x80),
            (0xFF11, 0xBF),
            (0xFF12, 0xF3),
            (0xFF13, 0xFF),
            (0xFF14, 0xBF),
            (0xFF16, 0x3F),
            (0xFF17, 0x00),
            (0xFF18, 0xFF),
            (0xFF19, 0xBF),
            (0xFF1A, 0x7F),
            (0xFF1B, 0xFF),
            (0xFF1C, 0x9F),
            (0xFF1D, 0xFF),
            (0xFF1E, 0xBF),
            (0xFF20, 0xFF),
            (0xFF21, 0x00),
            (0xFF22, 0x00),
            (0xFF23, 0xBF),
            (0xFF24, 0x77),
            (0xFF25, 0xF3),
            (0xFF26, 0xF1),
        ];
        for (addr, value) in SOUND_DEFAULTS {
            self.memory[addr] = value;
        }

        self.memory[0xFF46] = 0xFF; // DMA
    }

    /// Fill WRAM and HRAM with deterministic pseudo-random bytes.
    ///
    /// Real hardware powers up with garbage there; a fixed-seed xorshift
    /// keeps runs reproducible while software still cannot rely on zeros.
    fn randomize_internal_ram(&mut self) {
        let mut x = RAM_SEED;
        let mut next_byte = || {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x as u8
        };

        // WRAM: 0xC000–0xDFFF. Echo RAM reads through it.
        for addr in 0xC000..=0xDFFF {
            self.memory[addr] = next_byte();
        }

        // HRAM: 0xFF80–0xFFFE.
        for addr in 0xFF80..=0xFFFE {
            self.memory[addr] = next_byte();
        }
    }
}
