//! One star per row, drifting left at three speeds.

use crate::console::Cartridge;
use crate::demos::Lcg;
use crate::graphics::api::{Clearer, Drawer, GraphicsApi};
use crate::input::InputSnapshot;

#[derive(Debug)]
pub struct StarfieldDemo {
    stars: Vec<i32>,
    rng: Lcg,
}

impl Default for StarfieldDemo {
    fn default() -> Self {
        Self {
            stars: Vec::new(),
            rng: Lcg::new(0x5eed),
        }
    }
}

impl Cartridge for StarfieldDemo {
    fn init(&mut self, gfx: &mut dyn GraphicsApi) -> anyhow::Result<()> {
        let w = gfx.width();
        self.stars = (0..gfx.height()).map(|_| self.rng.below(w)).collect();
        Ok(())
    }

    fn update(&mut self, _input: &InputSnapshot) {}

    fn render(&mut self, gfx: &mut dyn GraphicsApi) {
        let w = gfx.width();
        gfx.cls_with_color(0);
        for (i, x) in self.stars.iter_mut().enumerate() {
            let i = i as i32;
            gfx.pset_with_color(*x, i, (i % 3 + 5) as u8);
            *x = (*x - i % 3).rem_euclid(w);
        }
    }
}
