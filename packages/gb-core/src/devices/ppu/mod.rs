mod fetch;
mod structs;

pub use structs::{Mode, Ppu, SCREEN_HEIGHT, SCREEN_WIDTH};

use structs::SpriteEntry;

use super::mmu::{Mmu, INT_LCD_STAT, INT_VBLANK};

const OAM_SCAN_DOTS: u16 = 80;
const DRAW_DOTS: u16 = SCREEN_WIDTH as u16;
const DOTS_PER_LINE: u16 = 456;
const LAST_LINE: u8 = 153;
const FIRST_VBLANK_LINE: u8 = 144;

impl Ppu {
    /// Advance the PPU by `t_cycles` T-cycles, one at a time, as directed
    /// by `GameBoy::run_frame` after the CPU's instruction and the MMU's
    /// timer/serial advance (spec.md §5's fixed ordering).
    pub fn step(&mut self, mmu: &mut Mmu, t_cycles: u32) {
        for _ in 0..t_cycles {
            self.tick(mmu);
        }
    }

    fn tick(&mut self, mmu: &mut Mmu) {
        if mmu.lcdc() & 0x80 == 0 {
            self.tick_disabled(mmu);
            return;
        }
        if !self.lcd_was_enabled {
            self.lcd_was_enabled = true;
            self.begin_frame(mmu);
        }

        match self.mode {
            Mode::OamScan => self.tick_oam_scan(mmu),
            Mode::Draw => self.tick_draw(mmu),
            Mode::HBlank => self.tick_hblank(mmu),
            Mode::VBlank => self.tick_vblank(mmu),
        }

        self.update_stat(mmu);
    }

    fn tick_disabled(&mut self, mmu: &mut Mmu) {
        if self.lcd_was_enabled {
            if self.mode != Mode::VBlank {
                log::warn!("LCD disabled outside V-blank (mode {:?})", self.mode);
            }
            self.lcd_was_enabled = false;
        }
        self.dot = 0;
        self.line = 0;
        self.mode = Mode::OamScan;
        mmu.set_ly(0);
        let stat = mmu.stat() & !0x03;
        mmu.set_stat(stat);
    }

    fn begin_frame(&mut self, mmu: &mut Mmu) {
        self.dot = 0;
        self.line = 0;
        mmu.set_ly(0);
        self.begin_line(mmu);
    }

    fn begin_line(&mut self, mmu: &mut Mmu) {
        self.mode = Mode::OamScan;
        self.dot = 0;
        self.scan_oam(mmu);
    }

    fn scan_oam(&mut self, mmu: &mut Mmu) {
        self.sprites_this_line.clear();
        let sprite_height: u8 = if mmu.lcdc() & 0x04 != 0 { 16 } else { 8 };
        for oam_index in 0..40u8 {
            if self.sprites_this_line.len() >= 10 {
                break;
            }
            let base = u16::from(oam_index) * 4;
            let y = mmu.oam_read(base);
            let x = mmu.oam_read(base + 1);
            let tile = mmu.oam_read(base + 2);
            let flags = mmu.oam_read(base + 3);
            let line_y = i16::from(self.line) + 16;
            let sprite_top = i16::from(y);
            if line_y >= sprite_top && line_y < sprite_top + i16::from(sprite_height) {
                self.sprites_this_line.push(SpriteEntry {
                    y,
                    x,
                    tile,
                    flags,
                    oam_index,
                });
            }
        }
        // Draw-time priority: primarily by x ascending, ties by OAM index
        // ascending (lower OAM index wins — a *stable* sort on x preserves
        // OAM-index order among ties, since entries were pushed in index order).
        self.sprites_this_line.sort_by_key(|s| s.x);
    }

    fn tick_oam_scan(&mut self, mmu: &mut Mmu) {
        self.dot += 1;
        if self.dot >= OAM_SCAN_DOTS {
            self.mode = Mode::Draw;
            self.pixel_x = 0;
            self.materialise_sprite_line(mmu);
        }
    }

    fn tick_draw(&mut self, mmu: &mut Mmu) {
        self.dot += 1;
        let x = self.pixel_x;
        let shade = self.compose_pixel(mmu, x);
        let row = self.line as usize;
        self.frame_buffer[row * SCREEN_WIDTH + x as usize] = shade;
        self.pixel_x += 1;
        if u16::from(self.pixel_x) >= DRAW_DOTS {
            self.mode = Mode::HBlank;
        }
    }

    fn tick_hblank(&mut self, mmu: &mut Mmu) {
        self.dot += 1;
        if self.dot >= DOTS_PER_LINE {
            self.advance_line(mmu);
        }
    }

    fn tick_vblank(&mut self, mmu: &mut Mmu) {
        self.dot += 1;
        if self.dot >= DOTS_PER_LINE {
            self.advance_line(mmu);
        }
    }

    fn advance_line(&mut self, mmu: &mut Mmu) {
        self.line += 1;
        mmu.set_ly(self.line);

        if self.line == FIRST_VBLANK_LINE {
            self.mode = Mode::VBlank;
            self.dot = 0;
            mmu.request_interrupt(INT_VBLANK);
            self.frame_ready = true;
            return;
        }
        if self.line > LAST_LINE {
            self.line = 0;
            mmu.set_ly(0);
            self.begin_line(mmu);
            return;
        }
        if self.mode == Mode::VBlank {
            self.dot = 0;
            return;
        }
        self.begin_line(mmu);
    }

    fn update_stat(&mut self, mmu: &mut Mmu) {
        let lyc_match = self.line == mmu.lyc();
        let stat = mmu.stat();
        let new_stat = (stat & !0x07) | self.mode.stat_bits() | if lyc_match { 0x04 } else { 0 };
        mmu.set_stat(new_stat);

        let conditions = ((new_stat & 0x08 != 0) && self.mode == Mode::HBlank)
            || ((new_stat & 0x10 != 0) && self.mode == Mode::VBlank)
            || ((new_stat & 0x20 != 0) && self.mode == Mode::OamScan)
            || ((new_stat & 0x40 != 0) && lyc_match);

        if conditions && !self.stat_irq_line {
            mmu.request_interrupt(INT_LCD_STAT);
        }
        self.stat_irq_line = conditions;
    }
}
