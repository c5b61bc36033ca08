//! Monochrome bitmap fonts.
//!
//! A [`BitmapFont`] covers ASCII 32..=127. Each glyph is up to 8×8 pixels,
//! stored as one byte per row with the leftmost pixel in the high bit.
//! Text rendering only writes set bits, so the background shows through.
//!
//! Two sources are supported:
//! - the built-in 3×5 font (lowercase letters render as uppercase)
//! - a glyph sheet image laid out as 16 columns × 6 rows of equal cells

use std::path::Path;

use crate::graphics::color::ColorId;
use crate::graphics::error::AssetError;
use crate::graphics::surface::{CellSize, PixelSurface};

/// First character code covered by a font.
pub const FIRST_CHAR: u8 = 32;
/// Number of glyphs in a font (ASCII 32..=127).
pub const NUM_GLYPHS: usize = 96;

const SHEET_COLUMNS: u32 = 16;
const SHEET_ROWS: u32 = 6;
const MAX_GLYPH_SIZE: u32 = 8;

/// Glyph rows, MSB = leftmost column.
pub type Glyph = [u8; 8];

/// Text metrics in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontMetrics {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapFont {
    glyph_width: i32,
    glyph_height: i32,
    glyphs: Vec<Glyph>,
}

impl BitmapFont {
    /// The built-in 3×5 font.
    pub fn builtin() -> Self {
        let mut glyphs = vec![[0u8; 8]; NUM_GLYPHS];
        for code in FIRST_CHAR..=127u8 {
            let packed = builtin_bits(code.to_ascii_uppercase());
            let glyph = &mut glyphs[(code - FIRST_CHAR) as usize];
            for (row, out) in glyph.iter_mut().take(5).enumerate() {
                // three bits per row, top row in the high bits
                let bits = ((packed >> (3 * (4 - row))) & 0b111) as u8;
                *out = bits << 5;
            }
        }
        Self {
            glyph_width: 3,
            glyph_height: 5,
            glyphs,
        }
    }

    /// Load a 16×6 glyph sheet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| AssetError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let font = Self::from_image(&image)?;
        log::info!(
            "Loaded {}x{} font from {}",
            font.glyph_width,
            font.glyph_height,
            path.display()
        );
        Ok(font)
    }

    /// Slice a decoded glyph sheet. A pixel is part of a glyph when it is
    /// mostly opaque and not black.
    pub fn from_image(image: &image::RgbaImage) -> Result<Self, AssetError> {
        let (width, height) = image.dimensions();
        let invalid = AssetError::InvalidDimensions {
            what: "font sheet",
            width,
            height,
        };
        if width == 0 || height == 0 || width % SHEET_COLUMNS != 0 || height % SHEET_ROWS != 0 {
            return Err(invalid);
        }
        let cell_w = width / SHEET_COLUMNS;
        let cell_h = height / SHEET_ROWS;
        if cell_w > MAX_GLYPH_SIZE || cell_h > MAX_GLYPH_SIZE {
            return Err(invalid);
        }

        let mut glyphs = vec![[0u8; 8]; NUM_GLYPHS];
        for (index, glyph) in glyphs.iter_mut().enumerate() {
            let ox = (index as u32 % SHEET_COLUMNS) * cell_w;
            let oy = (index as u32 / SHEET_COLUMNS) * cell_h;
            for row in 0..cell_h {
                let mut bits = 0u8;
                for col in 0..cell_w {
                    let px = image.get_pixel(ox + col, oy + row).0;
                    if px[3] >= 128 && (px[0] | px[1] | px[2]) != 0 {
                        bits |= 0x80 >> col;
                    }
                }
                glyph[row as usize] = bits;
            }
        }

        Ok(Self {
            glyph_width: cell_w as i32,
            glyph_height: cell_h as i32,
            glyphs,
        })
    }

    pub fn glyph_width(&self) -> i32 {
        self.glyph_width
    }

    pub fn glyph_height(&self) -> i32 {
        self.glyph_height
    }

    /// Glyph for a character; anything outside ASCII renders as `?`.
    pub fn glyph(&self, ch: char) -> &Glyph {
        let code = if ch.is_ascii() && ch as u32 >= FIRST_CHAR as u32 {
            ch as u8
        } else {
            b'?'
        };
        &self.glyphs[(code - FIRST_CHAR) as usize]
    }

    /// Size of `text` when advanced one `cell` per character.
    pub fn measure(&self, text: &str, cell: CellSize) -> FontMetrics {
        let count = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
        if count == 0 {
            return FontMetrics::default();
        }
        FontMetrics {
            width: count.saturating_mul(cell.width),
            height: self.glyph_height.min(cell.height),
        }
    }

    /// Draw `text` with its first cell's top-left at (x, y).
    ///
    /// Glyphs past the right edge of the surface end the walk.
    pub fn draw_text(
        &self,
        surface: &mut PixelSurface,
        x: i32,
        y: i32,
        text: &str,
        color: ColorId,
        cell: CellSize,
    ) {
        let w = self.glyph_width.min(cell.width);
        let h = self.glyph_height.min(cell.height);
        for (i, ch) in text.chars().enumerate() {
            let gx = x as i64 + i as i64 * cell.width as i64;
            if gx >= surface.width() as i64 {
                break;
            }
            if gx + (w as i64) <= 0 {
                continue;
            }
            let glyph = self.glyph(ch);
            for (row, bits) in glyph.iter().take(h as usize).enumerate() {
                let Ok(py) = i32::try_from(y as i64 + row as i64) else {
                    break;
                };
                if *bits == 0 {
                    continue;
                }
                for col in 0..w {
                    if bits & (0x80 >> col) != 0 {
                        surface.set((gx + col as i64) as i32, py, color);
                    }
                }
            }
        }
    }
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Packed 3×5 glyphs: five rows of three bits, top row first.
fn builtin_bits(code: u8) -> u16 {
    match code {
        b'!' => 0b010_010_010_000_010,
        b'"' => 0b101_101_000_000_000,
        b'#' => 0b101_111_101_111_101,
        b'$' => 0b011_110_111_011_110,
        b'%' => 0b101_001_010_100_101,
        b'&' => 0b010_101_010_101_011,
        b'\'' => 0b010_010_000_000_000,
        b'(' => 0b001_010_010_010_001,
        b')' => 0b100_010_010_010_100,
        b'*' => 0b000_101_010_101_000,
        b'+' => 0b000_010_111_010_000,
        b',' => 0b000_000_000_010_100,
        b'-' => 0b000_000_111_000_000,
        b'.' => 0b000_000_000_000_010,
        b'/' => 0b001_001_010_100_100,
        b'0' => 0b111_101_101_101_111,
        b'1' => 0b010_110_010_010_111,
        b'2' => 0b111_001_111_100_111,
        b'3' => 0b111_001_011_001_111,
        b'4' => 0b101_101_111_001_001,
        b'5' => 0b111_100_111_001_111,
        b'6' => 0b100_100_111_101_111,
        b'7' => 0b111_001_001_001_001,
        b'8' => 0b111_101_111_101_111,
        b'9' => 0b111_101_111_001_001,
        b':' => 0b000_010_000_010_000,
        b';' => 0b000_010_000_010_100,
        b'<' => 0b001_010_100_010_001,
        b'=' => 0b000_111_000_111_000,
        b'>' => 0b100_010_001_010_100,
        b'?' => 0b111_001_011_000_010,
        b'@' => 0b010_101_101_100_011,
        b'A' => 0b111_101_111_101_101,
        b'B' => 0b110_101_110_101_110,
        b'C' => 0b011_100_100_100_011,
        b'D' => 0b110_101_101_101_110,
        b'E' => 0b111_100_110_100_111,
        b'F' => 0b111_100_110_100_100,
        b'G' => 0b011_100_101_101_011,
        b'H' => 0b101_101_111_101_101,
        b'I' => 0b111_010_010_010_111,
        b'J' => 0b111_001_001_101_010,
        b'K' => 0b101_101_110_101_101,
        b'L' => 0b100_100_100_100_111,
        b'M' => 0b101_111_111_101_101,
        b'N' => 0b110_101_101_101_101,
        b'O' => 0b010_101_101_101_010,
        b'P' => 0b110_101_110_100_100,
        b'Q' => 0b010_101_101_110_011,
        b'R' => 0b110_101_110_101_101,
        b'S' => 0b011_100_010_001_110,
        b'T' => 0b111_010_010_010_010,
        b'U' => 0b101_101_101_101_011,
        b'V' => 0b101_101_101_101_010,
        b'W' => 0b101_101_111_111_101,
        b'X' => 0b101_101_010_101_101,
        b'Y' => 0b101_101_111_010_010,
        b'Z' => 0b111_001_010_100_111,
        b'[' => 0b011_010_010_010_011,
        b'\\' => 0b100_100_010_001_001,
        b']' => 0b110_010_010_010_110,
        b'^' => 0b010_101_000_000_000,
        b'_' => 0b000_000_000_000_111,
        b'`' => 0b010_001_000_000_000,
        b'{' => 0b011_010_110_010_011,
        b'|' => 0b010_010_010_010_010,
        b'}' => 0b110_010_011_010_110,
        b'~' => 0b000_001_111_100_000,
        _ => 0,
    }
}
