use std::fmt;

use dotmatrix_common::Color;

use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// One finished 160x144 picture.
///
/// Pixels are DMG shades 0..=3 (0 lightest) with the BGP/OBP palettes
/// already applied, so a frontend only needs a four-entry colour ramp.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    shades: Box<[u8]>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &SCREEN_WIDTH)
            .field("height", &SCREEN_HEIGHT)
            .finish_non_exhaustive()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            shades: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn shade(&self, x: usize, y: usize) -> u8 {
        self.shades[y * SCREEN_WIDTH + x]
    }

    pub fn shades(&self) -> &[u8] {
        &self.shades
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.shades[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.shades[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    pub(crate) fn clear(&mut self) {
        self.shades.fill(0);
    }

    /// Expand into packed RGB24 using `palette[shade]`.
    ///
    /// Writes at most `out.len() / 3` pixels.
    pub fn write_rgb24(&self, palette: &[Color; 4], out: &mut [u8]) {
        for (shade, px) in self.shades.iter().zip(out.chunks_exact_mut(3)) {
            let (r, g, b) = palette[(*shade & 0x03) as usize].rgb();
            px.copy_from_slice(&[r, g, b]);
        }
    }

    pub fn to_argb(&self, palette: &[Color; 4]) -> Vec<u32> {
        self.shades
            .iter()
            .map(|&shade| palette[(shade & 0x03) as usize].to_argb())
            .collect()
    }
}
