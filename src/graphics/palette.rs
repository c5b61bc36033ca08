//! Console palettes.
//!
//! A [`Palette`] maps the sixteen [`ColorId`] slots to display colours. It
//! keeps three pieces of state:
//! - the active colours, rewritten by `map_color` / `set_transparent`
//! - an exact reverse lookup (colour → lowest slot holding it)
//! - the snapshot taken at construction, restored by `reset`
//!
//! Every mutation bumps a version counter so colour-derived caches further
//! down the pipeline (the presenter's per-slot RGBA tables) know to rebuild.

use std::collections::HashMap;

use crate::graphics::color::{ColorId, Rgba, PALETTE_SIZE};
use crate::graphics::error::PaletteError;

/// Display colours of every palette slot.
pub type PaletteColors = [Rgba; PALETTE_SIZE];

/// Indexed-colour palette with a resettable snapshot.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: PaletteColors,
    original: PaletteColors,
    reverse: HashMap<Rgba, ColorId>,
    version: u32,
}

impl Palette {
    pub fn new(colors: PaletteColors) -> Self {
        let mut palette = Self {
            colors,
            original: colors,
            reverse: HashMap::with_capacity(PALETTE_SIZE),
            version: 0,
        };
        palette.rebuild_reverse();
        palette
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Incremented on every mutation.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn colors(&self) -> &PaletteColors {
        &self.colors
    }

    /// Current display colour of a slot.
    pub fn color(&self, id: ColorId) -> Result<Rgba, PaletteError> {
        Ok(self.colors[self.check(id)?])
    }

    /// Display colour of a slot that is already known to be valid.
    #[inline]
    pub(crate) fn color_unchecked(&self, id: ColorId) -> Rgba {
        self.colors[id as usize % PALETTE_SIZE]
    }

    /// Exact reverse lookup. No quantisation: anything that is not exactly a
    /// current palette colour yields `None`.
    pub fn color_id(&self, rgba: Rgba) -> Option<ColorId> {
        self.reverse.get(&rgba).copied()
    }

    /// Replace the display colour of `from` with the one currently at `to`.
    ///
    /// Pixels already painted with `from` change on the next present without
    /// being repainted.
    pub fn map_color(&mut self, from: ColorId, to: ColorId) -> Result<(), PaletteError> {
        let from_idx = self.check(from)?;
        let to_idx = self.check(to)?;
        self.colors[from_idx] = self.colors[to_idx];
        self.touch();
        log::debug!("palette: mapped {} -> {} ({})", from, to, self.colors[from_idx]);
        Ok(())
    }

    /// Toggle full transparency of one slot.
    pub fn set_transparent(&mut self, id: ColorId, enabled: bool) -> Result<(), PaletteError> {
        let idx = self.check(id)?;
        let alpha = if enabled { 0 } else { 255 };
        self.colors[idx] = self.colors[idx].alpha(alpha);
        self.touch();
        log::debug!("palette: slot {} transparent={}", id, enabled);
        Ok(())
    }

    /// Restore every slot to the construction snapshot.
    pub fn reset(&mut self) {
        self.colors = self.original;
        self.touch();
    }

    /// Independent palette carrying the same current state.
    #[must_use]
    pub fn copy(&self) -> Palette {
        self.clone()
    }

    fn check(&self, id: ColorId) -> Result<usize, PaletteError> {
        let idx = id as usize;
        if idx >= self.colors.len() {
            return Err(PaletteError::OutOfRange {
                id,
                size: self.colors.len(),
            });
        }
        Ok(idx)
    }

    fn touch(&mut self) {
        self.rebuild_reverse();
        self.version = self.version.wrapping_add(1);
    }

    // Lowest slot wins when several slots share a colour.
    fn rebuild_reverse(&mut self) {
        self.reverse.clear();
        for (idx, color) in self.colors.iter().enumerate().rev() {
            self.reverse.insert(*color, idx as ColorId);
        }
    }
}

impl PartialEq for Palette {
    fn eq(&self, other: &Self) -> bool {
        self.colors == other.colors && self.original == other.original
    }
}

// ============================================================================
// Machine palettes
// ============================================================================

const fn hex_palette(values: [u32; PALETTE_SIZE]) -> PaletteColors {
    let mut out = [Rgba::new(0, 0, 0); PALETTE_SIZE];
    let mut i = 0;
    while i < PALETTE_SIZE {
        out[i] = Rgba::from_hex(values[i]);
        i += 1;
    }
    out
}

pub const PICO8_PALETTE: PaletteColors = hex_palette([
    0x000000, 0x1D2B53, 0x7E2553, 0x008751, 0xAB5236, 0x5F574F, 0xC2C3C7, 0xFFF1E8,
    0xFF004D, 0xFFA300, 0xFFEC27, 0x00E436, 0x29ADFF, 0x83769C, 0xFF77A8, 0xFFCCAA,
]);

/// DawnBringer 16, the TIC-80 default at the time.
pub const TIC80_PALETTE: PaletteColors = hex_palette([
    0x140C1C, 0x442434, 0x30346D, 0x4E4A4E, 0x854C30, 0x346524, 0xD04648, 0x757161,
    0x597DCE, 0xD27D2C, 0x8595A1, 0x6DAA2C, 0xD2AA99, 0x6DC2CA, 0xDAD45E, 0xDEEED6,
]);

/// Normal then bright colours. Black appears twice.
pub const ZX_SPECTRUM_PALETTE: PaletteColors = hex_palette([
    0x000000, 0x0000CD, 0xCD0000, 0xCD00CD, 0x00CD00, 0x00CDCD, 0xCDCD00, 0xCDCDCD,
    0x000000, 0x0000FF, 0xFF0000, 0xFF00FF, 0x00FF00, 0x00FFFF, 0xFFFF00, 0xFFFFFF,
]);

/// "Pepto" measurements of the VIC-II colours.
pub const C64_PALETTE: PaletteColors = hex_palette([
    0x000000, 0xFFFFFF, 0x68372B, 0x70A4B2, 0x6F3D86, 0x588D43, 0x352879, 0xB8C76F,
    0x6F4F25, 0x433900, 0x9A6759, 0x444444, 0x6C6C6C, 0x9AD284, 0x6C5EB5, 0x959595,
]);

/// Named PICO-8 colour slots.
pub mod pico8 {
    use crate::graphics::color::ColorId;

    pub const BLACK: ColorId = 0;
    pub const DARK_BLUE: ColorId = 1;
    pub const DARK_PURPLE: ColorId = 2;
    pub const DARK_GREEN: ColorId = 3;
    pub const BROWN: ColorId = 4;
    pub const DARK_GRAY: ColorId = 5;
    pub const LIGHT_GRAY: ColorId = 6;
    pub const WHITE: ColorId = 7;
    pub const RED: ColorId = 8;
    pub const ORANGE: ColorId = 9;
    pub const YELLOW: ColorId = 10;
    pub const GREEN: ColorId = 11;
    pub const BLUE: ColorId = 12;
    pub const INDIGO: ColorId = 13;
    pub const PINK: ColorId = 14;
    pub const PEACH: ColorId = 15;
}

pub mod tic80 {
    use crate::graphics::color::ColorId;

    pub const BLACK: ColorId = 0;
    pub const WHITE: ColorId = 15;
}

pub mod zx {
    use crate::graphics::color::ColorId;

    pub const BLACK: ColorId = 0;
    pub const BLUE: ColorId = 1;
    pub const RED: ColorId = 2;
    pub const WHITE: ColorId = 7;
}

pub mod c64 {
    use crate::graphics::color::ColorId;

    pub const BLACK: ColorId = 0;
    pub const WHITE: ColorId = 1;
    pub const BLUE: ColorId = 6;
    pub const LIGHT_BLUE: ColorId = 14;
}
