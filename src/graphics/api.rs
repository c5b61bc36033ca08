//! Drawing capabilities handed to cartridges.
//!
//! The API is split along the lines a cartridge actually uses it (clearing,
//! primitives, palette, memory, text, sprites) and glued back together by
//! [`GraphicsApi`], which is what cartridges receive each frame.
//!
//! Colour arguments are plain colour ids. Every `*_with_color` form also
//! makes that colour the current drawing colour, so a later call without a
//! colour reuses it.

use crate::graphics::color::{ColorId, Rgba};
use crate::graphics::error::PaletteError;
use crate::graphics::palette::{Palette, PaletteColors};
use crate::graphics::surface::Pos;

pub trait Clearer {
    /// Fill the surface with the background colour.
    fn cls(&mut self);
    /// Make `color` the background colour and clear with it.
    fn cls_with_color(&mut self, color: ColorId);
}

pub trait Drawer {
    fn set_color(&mut self, color: ColorId);
    fn color(&self) -> ColorId;

    fn pset(&mut self, x: i32, y: i32);
    fn pset_with_color(&mut self, x: i32, y: i32, color: ColorId);
    /// Colour id whose display colour matches the pixel at (x, y). Pixels
    /// outside the surface read as 0.
    fn pget(&self, x: i32, y: i32) -> ColorId;

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);
    fn line_with_color(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: ColorId);
    fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);
    fn rect_with_color(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: ColorId);
    fn rect_fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);
    fn rect_fill_with_color(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: ColorId);
    fn circle(&mut self, x: i32, y: i32, r: i32);
    fn circle_with_color(&mut self, x: i32, y: i32, r: i32, color: ColorId);
    fn circle_fill(&mut self, x: i32, y: i32, r: i32);
    fn circle_fill_with_color(&mut self, x: i32, y: i32, r: i32, color: ColorId);
}

pub trait Paletter {
    fn palette_reset(&mut self);
    fn palette_copy(&self) -> Palette;
    fn get_color(&self, color: ColorId) -> Result<Rgba, PaletteError>;
    fn get_color_id(&self, rgba: Rgba) -> Result<ColorId, PaletteError>;
    fn get_colors(&self) -> PaletteColors;
    fn map_color(&mut self, from: ColorId, to: ColorId) -> Result<(), PaletteError>;
    fn set_transparent(&mut self, color: ColorId, enabled: bool) -> Result<(), PaletteError>;
}

/// Raw pixel memory. Address `y * width + x`.
pub trait Peeker {
    fn peek(&self, addr: usize) -> ColorId;
    fn poke(&mut self, addr: usize, value: ColorId);
}

pub trait Printer {
    /// Move the text cursor, in character cells.
    fn cursor(&mut self, x: i32, y: i32);
    fn get_cursor(&self) -> Pos;
    /// Print at the cursor and move it down one row.
    fn print(&mut self, text: &str);
    fn print_at(&mut self, text: &str, x: i32, y: i32);
    fn print_at_with_color(&mut self, text: &str, x: i32, y: i32, color: ColorId);
    fn scroll_up_line(&mut self);
}

pub trait Spriter {
    #[allow(clippy::too_many_arguments)]
    fn sprite(&mut self, n: i32, x: i32, y: i32, w: i32, h: i32, dw: i32, dh: i32);

    #[allow(clippy::too_many_arguments)]
    fn sprite_flipped(
        &mut self,
        n: i32,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        dw: i32,
        dh: i32,
        flip_x: bool,
        flip_y: bool,
    );

    /// Rotation in whole degrees, clockwise.
    #[allow(clippy::too_many_arguments)]
    fn sprite_rotated(
        &mut self,
        n: i32,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        dw: i32,
        dh: i32,
        rotation: i32,
    );
}

/// Everything a cartridge can do to the screen.
pub trait GraphicsApi: Clearer + Drawer + Paletter + Peeker + Printer + Spriter {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
}
