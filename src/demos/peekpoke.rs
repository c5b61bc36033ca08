//! Raw pixel memory: walks the surface a chunk at a time, incrementing
//! every byte it passes.

use crate::console::Cartridge;
use crate::graphics::api::{GraphicsApi, Peeker, Printer};
use crate::input::InputSnapshot;

const BYTES_PER_FRAME: usize = 512;

#[derive(Debug, Default)]
pub struct PeekPokeDemo {
    addr: usize,
}

impl Cartridge for PeekPokeDemo {
    fn update(&mut self, _input: &InputSnapshot) {}

    fn render(&mut self, gfx: &mut dyn GraphicsApi) {
        let len = (gfx.width() * gfx.height()) as usize;
        for _ in 0..BYTES_PER_FRAME {
            let value = gfx.peek(self.addr);
            gfx.poke(self.addr, value.wrapping_add(1));
            self.addr = (self.addr + 1) % len;
        }
        gfx.print_at_with_color("PEEK/POKE", 2, 2, 7);
    }
}
