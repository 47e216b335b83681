use super::registers::apply_palette;
use super::{Lcdc, OamEntry, Ppu, MEMORY_SIZE};
use crate::SCREEN_WIDTH;

const MAX_SPRITES_PER_LINE: usize = 10;

/// Colour index (0..=3) of one pixel of a tile row.
#[inline]
fn tile_pixel(memory: &[u8; MEMORY_SIZE], tile_addr: u16, row: u8, column: u8) -> u8 {
    let addr = tile_addr as usize + row as usize * 2;
    let lo = memory[addr];
    let hi = memory[addr + 1];
    let bit = 7 - column;
    (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1)
}

impl Ppu {
    /// Address of a BG/window tile under the LCDC.4 addressing mode.
    fn bg_tile_addr(&self, tile_index: u8) -> u16 {
        if self.lcdc.contains(Lcdc::TILE_DATA_LOW) {
            0x8000 + tile_index as u16 * 16
        } else {
            (0x9000i32 + tile_index as i8 as i32 * 16) as u16
        }
    }

    /// Colour index at `(x, y)` in the 256x256 plane of the map at `map_base`.
    fn map_pixel(&self, memory: &[u8; MEMORY_SIZE], map_base: u16, x: u8, y: u8) -> u8 {
        let map_addr = map_base as usize + (y as usize / 8) * 32 + x as usize / 8;
        let tile_addr = self.bg_tile_addr(memory[map_addr]);
        tile_pixel(memory, tile_addr, y % 8, x % 8)
    }

    /// Render scanline LY into the back buffer: background, then window,
    /// then sprites.
    pub(super) fn render_line(&mut self, memory: &[u8; MEMORY_SIZE]) {
        let ly = self.ly;
        // Raw BG/window colour indices, needed for sprite priority.
        let mut bg_colors = [0u8; SCREEN_WIDTH];
        let mut shades = [0u8; SCREEN_WIDTH];

        if self.lcdc.contains(Lcdc::BG_ENABLE) {
            let bg_y = ly.wrapping_add(self.scy);
            for (x, color) in bg_colors.iter_mut().enumerate() {
                let bg_x = (x as u8).wrapping_add(self.scx);
                *color = self.map_pixel(memory, self.lcdc.bg_map(), bg_x, bg_y);
            }
            self.draw_window_line(memory, &mut bg_colors);
            for (shade, &color) in shades.iter_mut().zip(bg_colors.iter()) {
                *shade = apply_palette(self.bgp, color);
            }
        }

        if self.lcdc.contains(Lcdc::OBJ_ENABLE) {
            self.draw_sprites(memory, &bg_colors, &mut shades);
        }

        self.frame.row_mut(ly as usize).copy_from_slice(&shades);
    }

    fn draw_window_line(&mut self, memory: &[u8; MEMORY_SIZE], colors: &mut [u8; SCREEN_WIDTH]) {
        if !self.lcdc.contains(Lcdc::WINDOW_ENABLE)
            || self.ly < self.window_start_line
            || self.wx > 166
        {
            return;
        }

        let start = self.wx as i32 - 7;
        let window_y = self.window_line;
        for (x, color) in colors.iter_mut().enumerate() {
            let window_x = x as i32 - start;
            if window_x < 0 {
                continue;
            }
            *color = self.map_pixel(memory, self.lcdc.window_map(), window_x as u8, window_y);
        }
        self.window_line = self.window_line.wrapping_add(1);
    }

    /// Sprites covering LY, limited to the first ten in OAM order and
    /// ordered so that the lowest X (then lowest index) wins.
    fn line_sprites(&self) -> Vec<OamEntry> {
        let height = self.lcdc.sprite_height() as i32;
        let ly = self.ly as i32;
        let mut sprites: Vec<(usize, OamEntry)> = self
            .oam
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, sprite)| {
                let top = sprite.y as i32 - 16;
                ly >= top && ly < top + height
            })
            .take(MAX_SPRITES_PER_LINE)
            .collect();
        sprites.sort_by_key(|&(index, sprite)| (sprite.x, index));
        sprites.into_iter().map(|(_, sprite)| sprite).collect()
    }

    fn draw_sprites(
        &self,
        memory: &[u8; MEMORY_SIZE],
        bg_colors: &[u8; SCREEN_WIDTH],
        shades: &mut [u8; SCREEN_WIDTH],
    ) {
        let height = self.lcdc.sprite_height();
        // A column belongs to the first opaque sprite pixel that lands on
        // it, even when that pixel ends up hidden behind the background.
        let mut claimed = [false; SCREEN_WIDTH];

        for sprite in self.line_sprites() {
            let mut row = (self.ly as i32 - (sprite.y as i32 - 16)) as u8;
            if sprite.flags & OamEntry::FLIP_Y != 0 {
                row = height - 1 - row;
            }
            let tile = if height == 16 {
                sprite.tile & 0xFE
            } else {
                sprite.tile
            };
            let tile_addr = 0x8000 + tile as u16 * 16;
            let palette = if sprite.flags & OamEntry::PALETTE_1 != 0 {
                self.obp1
            } else {
                self.obp0
            };

            for column in 0..8u8 {
                let x = sprite.x as i32 - 8 + column as i32;
                if !(0..SCREEN_WIDTH as i32).contains(&x) {
                    continue;
                }
                let x = x as usize;
                if claimed[x] {
                    continue;
                }

                let source_column = if sprite.flags & OamEntry::FLIP_X != 0 {
                    7 - column
                } else {
                    column
                };
                let color = tile_pixel(memory, tile_addr, row, source_column);
                if color == 0 {
                    continue;
                }
                claimed[x] = true;

                if sprite.flags & OamEntry::BEHIND_BG != 0 && bg_colors[x] != 0 {
                    continue;
                }
                shades[x] = apply_palette(palette, color);
            }
        }
    }
}
