use super::structs::{Ppu, SpritePixel};
use super::SCREEN_WIDTH;
use crate::devices::mmu::Mmu;

impl Ppu {
    /// One tile row is 2 bytes; bit `7 - col` of each byte forms the 2-bit
    /// colour index (low byte -> lsb, high byte -> msb), per spec.md §4.3.
    fn tile_row_pixel(mmu: &Mmu, tile_data_addr: u16, row: u8, col: u8) -> u8 {
        let row_addr = tile_data_addr + u16::from(row) * 2;
        let lo = mmu.vram_read(row_addr - 0x8000);
        let hi = mmu.vram_read(row_addr + 1 - 0x8000);
        let bit = 7 - col;
        let lsb = (lo >> bit) & 1;
        let msb = (hi >> bit) & 1;
        (msb << 1) | lsb
    }

    /// Background/window tile data base address for `tile_index`, honouring
    /// LCDC bit 4's addressing mode (the 0x8000-unsigned vs. 0x9000-signed
    /// block selection).
    fn bg_tile_data_addr(mmu: &Mmu, tile_index: u8) -> u16 {
        if mmu.lcdc() & 0x10 != 0 {
            0x8000 + u16::from(tile_index) * 16
        } else {
            let signed = tile_index as i8;
            (0x9000i32 + i32::from(signed) * 16) as u16
        }
    }

    fn bg_window_color_index(&self, mmu: &Mmu, x: u8) -> u8 {
        let lcdc = mmu.lcdc();
        let window_enabled = lcdc & 0x20 != 0;
        let wx = mmu.wx();
        let wy = mmu.wy();
        let in_window = window_enabled
            && self.line >= wy
            && i16::from(x) + 7 >= i16::from(wx);

        let (map_base, source_x, source_y): (u16, u8, u8) = if in_window {
            let map_base = if lcdc & 0x40 != 0 { 0x9C00 } else { 0x9800 };
            let source_x = (i16::from(x) + 7 - i16::from(wx)) as u8;
            let source_y = self.line.wrapping_sub(wy);
            (map_base, source_x, source_y)
        } else {
            let map_base = if lcdc & 0x08 != 0 { 0x9C00 } else { 0x9800 };
            let scx = mmu.scx();
            let scy = mmu.scy();
            let source_x = x.wrapping_add(scx);
            let source_y = self.line.wrapping_add(scy);
            (map_base, source_x, source_y)
        };

        let map_addr = map_base
            + u16::from(source_y / 8) * 32
            + u16::from(source_x / 8);
        let tile_index = mmu.vram_read(map_addr - 0x8000);
        let tile_addr = Self::bg_tile_data_addr(mmu, tile_index);
        let color = Self::tile_row_pixel(mmu, tile_addr, source_y % 8, source_x % 8);

        if lcdc & 0x01 == 0 {
            0
        } else {
            color
        }
    }

    fn apply_palette(palette: u8, color_idx: u8) -> u8 {
        (palette >> (color_idx * 2)) & 0x03
    }

    /// Build the materialised sprite pixel buffer for the current line, at
    /// the start of the draw phase. Sprites were already sorted
    /// x-ascending (ties OAM-index-ascending) during OAM scan, so the
    /// first sprite to claim a column is the one with draw-time priority;
    /// non-transparent slots are never overwritten.
    pub(super) fn materialise_sprite_line(&mut self, mmu: &mut Mmu) {
        self.sprite_line = [SpritePixel::default(); SCREEN_WIDTH];
        let tall = mmu.lcdc() & 0x04 != 0;

        let sprites = self.sprites_this_line.clone();
        for sprite in &sprites {
            let y_flip = sprite.flags & 0x40 != 0;
            let x_flip = sprite.flags & 0x20 != 0;
            let use_obp1 = sprite.flags & 0x10 != 0;
            let high_priority = sprite.flags & 0x80 == 0;

            let sprite_height: u8 = if tall { 16 } else { 8 };
            let mut row = (i16::from(self.line) + 16 - i16::from(sprite.y)) as u8;
            if y_flip {
                row = sprite_height - 1 - row;
            }
            let tile = if tall { sprite.tile & 0xFE } else { sprite.tile };
            let tile_addr = 0x8000u16 + u16::from(tile) * 16;

            for col in 0..8u8 {
                let screen_x = i16::from(sprite.x) + i16::from(col) - 8;
                if !(0..SCREEN_WIDTH as i16).contains(&screen_x) {
                    continue;
                }
                let sample_col = if x_flip { 7 - col } else { col };
                let color_idx = Self::tile_row_pixel(mmu, tile_addr, row, sample_col);
                if color_idx == 0 {
                    continue; // transparent: never claims a slot
                }
                let slot = &mut self.sprite_line[screen_x as usize];
                if slot.color_idx == 0 {
                    *slot = SpritePixel {
                        color_idx,
                        high_priority,
                        use_obp1,
                    };
                }
            }
        }
    }

    /// Render one pixel at column `x` on the current line, applying the
    /// compositing priority rule from spec.md §4.3.
    pub(super) fn compose_pixel(&mut self, mmu: &mut Mmu, x: u8) -> u8 {
        let bg_color_idx = self.bg_window_color_index(mmu, x);
        let bg_enabled = mmu.lcdc() & 0x01 != 0;
        // Disabled BG/window is literal white, not BGP's mapping of index 0.
        let bg_shade = if bg_enabled {
            Self::apply_palette(mmu.bgp(), bg_color_idx)
        } else {
            0
        };

        let sprites_enabled = mmu.lcdc() & 0x02 != 0;
        let sprite = self.sprite_line[x as usize];

        if sprites_enabled && sprite.color_idx != 0 && sprite.high_priority {
            let palette = if sprite.use_obp1 {
                mmu.obp1()
            } else {
                mmu.obp0()
            };
            return Self::apply_palette(palette, sprite.color_idx);
        }
        if bg_color_idx != 0 {
            return bg_shade;
        }
        if sprites_enabled && sprite.color_idx != 0 {
            let palette = if sprite.use_obp1 {
                mmu.obp1()
            } else {
                mmu.obp0()
            };
            return Self::apply_palette(palette, sprite.color_idx);
        }
        bg_shade
    }
}
