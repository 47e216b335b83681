pub mod app;
pub mod key;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Classic four-shade grey ramp, lightest first.
    pub const DMG_GREYS: [Color; 4] = [
        Color::new_rgb(0xFF, 0xFF, 0xFF),
        Color::new_rgb(0xAA, 0xAA, 0xAA),
        Color::new_rgb(0x55, 0x55, 0x55),
        Color::new_rgb(0x00, 0x00, 0x00),
    ];

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    #[inline]
    pub const fn new_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Pack as `0xAARRGGBB`.
    pub const fn to_argb(&self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }
}
