//! Palette tricks: remapping a slot and blinking transparency, restored
//! with a reset every frame.

use crate::console::Cartridge;
use crate::graphics::api::{Clearer, Drawer, GraphicsApi, Paletter, Printer};
use crate::graphics::color::PALETTE_SIZE;
use crate::input::InputSnapshot;

const SWAP_EVERY: u32 = 15;

#[derive(Debug, Default)]
pub struct PaletteDemo {
    frame: u32,
}

impl Cartridge for PaletteDemo {
    fn update(&mut self, _input: &InputSnapshot) {
        self.frame = self.frame.wrapping_add(1);
    }

    fn render(&mut self, gfx: &mut dyn GraphicsApi) {
        let (w, h) = (gfx.width(), gfx.height());
        let slots = PALETTE_SIZE as i32;

        gfx.palette_reset();
        gfx.cls_with_color(0);

        let bar = w / slots;
        for i in 0..slots {
            gfx.rect_fill_with_color(i * bar, 16, (i + 1) * bar, h - 16, i as u8);
        }

        let phase = (self.frame / SWAP_EVERY) as u8;
        let from = 1 + phase % (PALETTE_SIZE as u8 - 1);
        if let Err(e) = gfx.map_color(from, 8) {
            log::warn!("palette demo: {}", e);
        }
        if let Err(e) = gfx.set_transparent(7, phase % 2 == 0) {
            log::warn!("palette demo: {}", e);
        }

        gfx.print_at_with_color("PALETTE", 2, 2, 7);
    }
}
