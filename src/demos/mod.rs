//! Built-in demo cartridges.

mod drawing;
mod palette;
mod peekpoke;
mod sprites;
mod starfield;
mod tweetcart;

use std::fmt;
use std::str::FromStr;

use crate::console::Cartridge;

pub use drawing::DrawingDemo;
pub use palette::PaletteDemo;
pub use peekpoke::PeekPokeDemo;
pub use sprites::SpritesDemo;
pub use starfield::StarfieldDemo;
pub use tweetcart::TweetcartDemo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Demo {
    #[default]
    Drawing,
    Palette,
    Sprites,
    Starfield,
    PeekPoke,
    Tweetcart,
}

impl Demo {
    pub const ALL: [Demo; 6] = [
        Demo::Drawing,
        Demo::Palette,
        Demo::Sprites,
        Demo::Starfield,
        Demo::PeekPoke,
        Demo::Tweetcart,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Demo::Drawing => "drawing",
            Demo::Palette => "palette",
            Demo::Sprites => "sprites",
            Demo::Starfield => "starfield",
            Demo::PeekPoke => "peekpoke",
            Demo::Tweetcart => "tweetcart",
        }
    }

    pub fn cartridge(&self) -> Box<dyn Cartridge + Send> {
        match self {
            Demo::Drawing => Box::new(DrawingDemo::default()),
            Demo::Palette => Box::new(PaletteDemo::default()),
            Demo::Sprites => Box::new(SpritesDemo::default()),
            Demo::Starfield => Box::new(StarfieldDemo::default()),
            Demo::PeekPoke => Box::new(PeekPokeDemo::default()),
            Demo::Tweetcart => Box::new(TweetcartDemo::default()),
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown demo '{0}' (expected one of drawing, palette, sprites, starfield, peekpoke, tweetcart)")]
pub struct UnknownDemo(String);

impl FromStr for Demo {
    type Err = UnknownDemo;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Demo::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| UnknownDemo(s.to_string()))
    }
}

/// Linear congruential generator (Numerical Recipes constants).
#[derive(Debug, Clone)]
pub(crate) struct Lcg {
    state: u32,
}

impl Lcg {
    pub(crate) fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub(crate) fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Value in `0..max`; 0 when `max` is not positive.
    pub(crate) fn below(&mut self, max: i32) -> i32 {
        if max <= 0 {
            return 0;
        }
        // high bits of an LCG are the better distributed ones
        ((self.next_u32() >> 8) % max as u32) as i32
    }
}
