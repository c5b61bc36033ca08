//! Primitive showcase: lines, rectangles, circles and text.

use crate::console::Cartridge;
use crate::graphics::api::{Clearer, Drawer, GraphicsApi, Printer};
use crate::input::InputSnapshot;

#[derive(Debug, Default)]
pub struct DrawingDemo {
    frame: i32,
}

impl Cartridge for DrawingDemo {
    fn update(&mut self, _input: &InputSnapshot) {
        self.frame = self.frame.wrapping_add(1);
    }

    fn render(&mut self, gfx: &mut dyn GraphicsApi) {
        let (w, h) = (gfx.width(), gfx.height());
        let t = self.frame;

        gfx.cls_with_color(0);
        gfx.print_at_with_color("DRAWING", 2, 2, 7);
        gfx.line_with_color(0, 10, w - 1, 10, 5);

        // line fan from the bottom-left corner
        for i in 0..8 {
            let x = (i * w / 8 + t) % w;
            gfx.line_with_color(0, h - 1, x, 12, (i % 15 + 1) as u8);
        }

        let cx = w / 2;
        let cy = h / 2;
        let r = 4 + (t % 20);
        gfx.circle_with_color(cx, cy, r, 12);
        gfx.circle_fill_with_color(cx, cy, r / 3, 8);

        gfx.rect_with_color(w - 30, 14, w - 4, 34, 11);
        gfx.rect_fill_with_color(w - 26, 18, w - 8, 30, 10);

        gfx.set_color(6);
        for i in 0..4 {
            gfx.pset(4 + i * 2, h - 4);
        }

        gfx.cursor(0, 2);
        gfx.print("PRIMITIVES");
    }
}
