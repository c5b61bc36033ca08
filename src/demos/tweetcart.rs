//! A grid of pulsing filled circles, in the spirit of a 280-character
//! tweetcart.

use crate::console::Cartridge;
use crate::graphics::api::{Clearer, Drawer, GraphicsApi};
use crate::input::InputSnapshot;

const GRID: i32 = 16;

#[derive(Debug, Default)]
pub struct TweetcartDemo {
    t: f64,
}

impl Cartridge for TweetcartDemo {
    fn update(&mut self, _input: &InputSnapshot) {
        self.t += 0.05;
    }

    fn render(&mut self, gfx: &mut dyn GraphicsApi) {
        let (w, h) = (gfx.width(), gfx.height());
        let step = (w.min(h) / GRID).max(1);
        let half = GRID as f64 / 2.0;

        gfx.cls_with_color(1);
        for gy in 0..GRID {
            for gx in 0..GRID {
                let dx = gx as f64 - half;
                let dy = gy as f64 - half;
                let a = dy.atan2(dx);
                let d = (dx * dx + dy * dy).sqrt();
                let r = (step as f64 / 2.0) * (1.0 + (a * 3.0 + d - self.t * 4.0).sin()) / 2.0;
                let color = ((d + self.t * 2.0) as i32).rem_euclid(15) + 1;
                gfx.circle_fill_with_color(
                    gx * step + step / 2,
                    gy * step + step / 2,
                    r.round() as i32,
                    color as u8,
                );
            }
        }
    }
}
