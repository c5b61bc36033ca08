//! The indexed offscreen frame.
//!
//! [`PixelSurface`] is a fixed-size grid of [`ColorId`]s plus the drawing
//! state that rides along with it: foreground/background colour and the
//! text cursor (in character cells, not pixels). It is allocated once per
//! console configuration and never resized.

use crate::graphics::color::{wrap_color, ColorId};

/// Integer position, either in pixels or in character cells depending on
/// context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Size of one font cell in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSize {
    pub width: i32,
    pub height: i32,
}

impl CellSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Character cell → top-left pixel of that cell.
    pub const fn char_to_pixel(&self, pos: Pos) -> Pos {
        Pos::new(
            pos.x.saturating_mul(self.width),
            pos.y.saturating_mul(self.height),
        )
    }

    /// Pixel → character cell containing it (truncating division).
    pub const fn pixel_to_char(&self, pos: Pos) -> Pos {
        Pos::new(pos.x / self.width, pos.y / self.height)
    }
}

/// Raised when the surface cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot allocate {width}x{height} pixel surface")]
pub struct SurfaceAllocError {
    pub width: i32,
    pub height: i32,
}

/// Indexed-colour frame buffer plus drawing state.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: i32,
    height: i32,
    pixels: Vec<ColorId>,
    fg: ColorId,
    bg: ColorId,
    cursor: Pos,
}

impl PixelSurface {
    pub fn new(width: i32, height: i32) -> Result<Self, SurfaceAllocError> {
        if width <= 0 || height <= 0 {
            return Err(SurfaceAllocError { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(SurfaceAllocError { width, height })?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| SurfaceAllocError { width, height })?;
        pixels.resize(len, 0);

        Ok(Self {
            width,
            height,
            pixels,
            fg: 0,
            bg: 0,
            cursor: Pos::default(),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[ColorId] {
        &self.pixels
    }

    pub fn fg(&self) -> ColorId {
        self.fg
    }

    pub fn bg(&self) -> ColorId {
        self.bg
    }

    pub fn set_fg(&mut self, color: ColorId) {
        self.fg = wrap_color(color);
    }

    pub fn set_bg(&mut self, color: ColorId) {
        self.bg = wrap_color(color);
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: Pos) {
        self.cursor = pos;
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Read a pixel; `None` outside the surface.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<ColorId> {
        if self.in_bounds(x, y) {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Write a pixel. Out-of-bounds writes are clipped silently.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: ColorId) {
        if self.in_bounds(x, y) {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Linear read used by peek.
    pub fn get_index(&self, index: usize) -> Option<ColorId> {
        self.pixels.get(index).copied()
    }

    /// Linear write used by poke.
    pub fn set_index(&mut self, index: usize, color: ColorId) {
        if let Some(px) = self.pixels.get_mut(index) {
            *px = wrap_color(color);
        }
    }

    /// Fill every pixel with one colour.
    pub fn fill(&mut self, color: ColorId) {
        self.pixels.fill(wrap_color(color));
    }

    /// Move everything below the first `rows` pixel rows up by `rows`.
    ///
    /// The bottom `rows` pixel rows keep their previous content.
    pub fn scroll_up(&mut self, rows: i32) {
        if rows <= 0 || rows >= self.height {
            return;
        }
        let stride = self.width as usize;
        let start = rows as usize * stride;
        self.pixels.copy_within(start.., 0);
    }
}
