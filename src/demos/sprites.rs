//! Sprite showcase: plain, rotated, flipped and scaled draws.

use crate::console::Cartridge;
use crate::graphics::api::{Clearer, Drawer, GraphicsApi, Paletter, Printer, Spriter};
use crate::input::InputSnapshot;

#[derive(Debug, Default)]
pub struct SpritesDemo {
    rot: i32,
    bar_y: i32,
    height: i32,
}

impl Cartridge for SpritesDemo {
    fn init(&mut self, gfx: &mut dyn GraphicsApi) -> anyhow::Result<()> {
        self.height = gfx.height();
        Ok(())
    }

    fn update(&mut self, _input: &InputSnapshot) {
        self.rot += 4;
        if self.rot > 360 {
            self.rot = 0;
        }
        self.bar_y += 1;
        if self.bar_y > self.height {
            self.bar_y = 0;
        }
    }

    fn render(&mut self, gfx: &mut dyn GraphicsApi) {
        gfx.palette_reset();
        // sprite backgrounds drawn in blue show up as white
        if let Err(e) = gfx.map_color(12, 7) {
            log::warn!("sprites demo: {}", e);
        }
        gfx.cls_with_color(7);
        gfx.rect_fill_with_color(0, self.bar_y, gfx.width(), self.bar_y + 48, 6);

        gfx.print_at_with_color("SPRITES:", 50, 5, 0);
        gfx.line(0, 12, gfx.width(), 12);
        gfx.print_at_with_color("SPRITE:", 10, 20, 0);
        gfx.sprite(0, 56, 16, 2, 2, 16, 16);

        gfx.print_at_with_color("ROTATED:", 10, 45, 0);
        gfx.print_at(&self.rot.to_string(), 80, 45);
        gfx.sprite_rotated(0, 56, 41, 2, 2, 16, 16, self.rot);

        gfx.print_at_with_color("FLIPPED:", 10, 70, 0);
        gfx.sprite_flipped(2, 56, 66, 2, 2, 16, 16, true, false);
        gfx.print_at("X", 62, 83);
        gfx.sprite_flipped(2, 76, 66, 2, 2, 16, 16, false, true);
        gfx.print_at("Y", 82, 83);
        gfx.sprite_flipped(2, 96, 66, 2, 2, 16, 16, true, true);
        gfx.print_at("XY", 100, 83);

        gfx.print_at_with_color("SCALED:", 10, 95, 0);
        gfx.sprite(40, 40, 95, 4, 2, 64, 32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConsoleConfig, ConsoleType};
    use crate::graphics::api::Peeker;
    use crate::graphics::{Assets, Engine};
    use rstest::rstest;

    #[rstest]
    #[case(ConsoleType::Pico8)]
    #[case(ConsoleType::Cbm64)]
    #[case(ConsoleType::Tic80)]
    fn test_layout_follows_surface_size(#[case] ty: ConsoleType) {
        let config = ConsoleConfig::for_type(ty);
        let assets = Assets::builtin(&config);
        let mut gfx = Engine::new(config, assets).unwrap();
        let mut demo = SpritesDemo::default();
        demo.init(&mut gfx).unwrap();

        let input = InputSnapshot::default();
        let mut lowest = 0;
        for _ in 0..2 * gfx.height() {
            demo.update(&input);
            assert!(demo.bar_y <= gfx.height());
            lowest = lowest.max(demo.bar_y);
        }
        assert_eq!(lowest, gfx.height());

        demo.render(&mut gfx);
        assert_eq!(gfx.pget(gfx.width() - 1, 12), 0);
    }
}
