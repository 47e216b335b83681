use bitflags::bitflags;

bitflags! {
    /// LCDC ($FF40).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Lcdc: u8 {
        const BG_ENABLE = 1 << 0;
        const OBJ_ENABLE = 1 << 1;
        const OBJ_TALL = 1 << 2;
        const BG_MAP_HIGH = 1 << 3;
        const TILE_DATA_LOW = 1 << 4;
        const WINDOW_ENABLE = 1 << 5;
        const WINDOW_MAP_HIGH = 1 << 6;
        const LCD_ENABLE = 1 << 7;
    }
}

bitflags! {
    /// Writable interrupt-select bits of STAT ($FF41).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct StatSelect: u8 {
        const HBLANK = 1 << 3;
        const VBLANK = 1 << 4;
        const OAM = 1 << 5;
        const LYC = 1 << 6;
    }
}

impl Lcdc {
    pub(super) fn bg_map(self) -> u16 {
        if self.contains(Lcdc::BG_MAP_HIGH) {
            0x9C00
        } else {
            0x9800
        }
    }

    pub(super) fn window_map(self) -> u16 {
        if self.contains(Lcdc::WINDOW_MAP_HIGH) {
            0x9C00
        } else {
            0x9800
        }
    }

    pub(super) fn sprite_height(self) -> u8 {
        if self.contains(Lcdc::OBJ_TALL) {
            16
        } else {
            8
        }
    }
}

/// One OAM record as captured at the end of OAM search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OamEntry {
    pub y: u8,
    pub x: u8,
    pub tile: u8,
    pub flags: u8,
}

impl OamEntry {
    pub const BEHIND_BG: u8 = 1 << 7;
    pub const FLIP_Y: u8 = 1 << 6;
    pub const FLIP_X: u8 = 1 << 5;
    pub const PALETTE_1: u8 = 1 << 4;

    pub(super) fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            y: bytes[0],
            x: bytes[1],
            tile: bytes[2],
            flags: bytes[3],
        }
    }
}

/// Map a 2-bit colour index through a DMG palette register.
#[inline]
pub(super) fn apply_palette(palette: u8, color: u8) -> u8 {
    (palette >> (color * 2)) & 0x03
}
