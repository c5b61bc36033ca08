//! The static sprite sheet.
//!
//! The sheet is decoded once at startup into an indexed image plus a
//! precomputed alpha mask (slot 0 transparent, everything else opaque).
//! Sprites are addressed by number, left to right then top to bottom, in
//! cells of a fixed size.

use std::path::Path;

use crate::graphics::bitmap::{Bitmap, Rect};
use crate::graphics::color::{ColorId, Rgba, PALETTE_SIZE, TRANSPARENT_INDEX};
use crate::graphics::error::AssetError;
use crate::graphics::palette::Palette;
use crate::graphics::surface::CellSize;

/// Size of the generated sheet used when no sprite file is configured.
const PLACEHOLDER_SIZE: i32 = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    image: Bitmap,
    mask: Bitmap,
    cell: CellSize,
}

impl SpriteSheet {
    /// Build a sheet from raw colour identifiers.
    pub fn from_indices(
        width: u32,
        height: u32,
        ids: Vec<ColorId>,
        cell: CellSize,
    ) -> Result<Self, AssetError> {
        if cell.width <= 0
            || cell.height <= 0
            || width == 0
            || height == 0
            || width % cell.width as u32 != 0
            || height % cell.height as u32 != 0
        {
            return Err(AssetError::InvalidDimensions {
                what: "sprite sheet",
                width,
                height,
            });
        }
        let actual = ids.len();
        if let Some(pos) = ids.iter().position(|&id| id as usize >= PALETTE_SIZE) {
            return Err(AssetError::InvalidColorId {
                x: pos as u32 % width,
                y: pos as u32 / width,
                id: ids[pos],
            });
        }
        let image = Bitmap::from_vec(width as i32, height as i32, ids).ok_or(
            AssetError::LengthMismatch {
                width,
                height,
                actual,
            },
        )?;
        let mask = image.map(|id| if id == TRANSPARENT_INDEX { 0 } else { 255 });
        Ok(Self { image, mask, cell })
    }

    /// Decode an image file, mapping every pixel to its exact palette slot.
    pub fn load(
        path: impl AsRef<Path>,
        palette: &Palette,
        cell: CellSize,
    ) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| AssetError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let sheet = Self::from_image(&image, palette, cell)?;
        log::info!(
            "Loaded {}x{} sprite sheet from {}",
            sheet.width(),
            sheet.height(),
            path.display()
        );
        Ok(sheet)
    }

    /// Fully transparent pixels become slot 0; everything else must match a
    /// palette colour exactly (alpha ignored).
    pub fn from_image(
        image: &image::RgbaImage,
        palette: &Palette,
        cell: CellSize,
    ) -> Result<Self, AssetError> {
        let (width, height) = image.dimensions();
        let mut ids = Vec::with_capacity((width * height) as usize);
        for (x, y, px) in image.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            if a == 0 {
                ids.push(TRANSPARENT_INDEX);
                continue;
            }
            let color = Rgba::new(r, g, b);
            let id = palette
                .color_id(color)
                .ok_or(AssetError::UnknownColor { x, y, color })?;
            ids.push(id);
        }
        Self::from_indices(width, height, ids, cell)
    }

    /// Generated 128×128 sheet: every cell gets an outline on its top and
    /// left edges plus a diagonal, in a colour derived from its number.
    pub fn placeholder(cell: CellSize) -> Self {
        let mut image = Bitmap::new(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE);
        let per_row = PLACEHOLDER_SIZE / cell.width.max(1);
        for y in 0..PLACEHOLDER_SIZE {
            for x in 0..PLACEHOLDER_SIZE {
                let (cx, cy) = (x % cell.width.max(1), y % cell.height.max(1));
                let n = (y / cell.height.max(1)) * per_row + x / cell.width.max(1);
                if cx == 0 || cy == 0 || cx == cy {
                    image.set(x, y, (n % (PALETTE_SIZE as i32 - 1)) as ColorId + 1);
                }
            }
        }
        let mask = image.map(|id| if id == TRANSPARENT_INDEX { 0 } else { 255 });
        Self { image, mask, cell }
    }

    pub fn image(&self) -> &Bitmap {
        &self.image
    }

    pub fn mask(&self) -> &Bitmap {
        &self.mask
    }

    pub fn cell(&self) -> CellSize {
        self.cell
    }

    pub fn width(&self) -> i32 {
        self.image.width()
    }

    pub fn height(&self) -> i32 {
        self.image.height()
    }

    pub fn cells_per_row(&self) -> i32 {
        (self.image.width() / self.cell.width).max(1)
    }

    /// Source rectangle of a `w`×`h` cell block starting at sprite `n`.
    ///
    /// `None` when the block does not fit pixel coordinates at all. The
    /// rectangle may still extend past the sheet.
    pub fn source_rect(&self, n: i32, w: i32, h: i32) -> Option<Rect> {
        let per_row = self.cells_per_row();
        Some(Rect::new(
            (n % per_row).checked_mul(self.cell.width)?,
            (n / per_row).checked_mul(self.cell.height)?,
            w.checked_mul(self.cell.width)?,
            h.checked_mul(self.cell.height)?,
        ))
    }

    /// The whole sheet as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::palette::PICO8_PALETTE;
    use image::RgbaImage;

    const CELL: CellSize = CellSize::new(8, 8);

    #[test]
    fn test_from_indices_builds_mask() {
        let mut ids = vec![0u8; 64];
        ids[9] = 3;
        let sheet = SpriteSheet::from_indices(8, 8, ids, CELL).unwrap();
        assert_eq!(sheet.mask().get(1, 1), 255);
        assert_eq!(sheet.mask().get(0, 0), 0);
        assert_eq!(sheet.image().get(1, 1), 3);
    }

    #[test]
    fn test_from_indices_validation() {
        assert!(matches!(
            SpriteSheet::from_indices(10, 8, vec![0; 80], CELL),
            Err(AssetError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            SpriteSheet::from_indices(8, 8, vec![0; 63], CELL),
            Err(AssetError::LengthMismatch { actual: 63, .. })
        ));
        let mut ids = vec![0u8; 64];
        ids[10] = 16;
        assert!(matches!(
            SpriteSheet::from_indices(8, 8, ids, CELL),
            Err(AssetError::InvalidColorId { x: 2, y: 1, id: 16 })
        ));
    }

    #[test]
    fn test_source_rect() {
        let sheet = SpriteSheet::placeholder(CELL);
        assert_eq!(sheet.cells_per_row(), 16);
        assert_eq!(sheet.source_rect(0, 1, 1), Some(Rect::new(0, 0, 8, 8)));
        assert_eq!(sheet.source_rect(17, 2, 1), Some(Rect::new(8, 8, 16, 8)));
    }

    #[test]
    fn test_source_rect_overflow_is_none() {
        let sheet = SpriteSheet::placeholder(CELL);
        assert_eq!(sheet.source_rect(0, 300_000_000, 1), None);
        assert_eq!(sheet.source_rect(0, 1, i32::MAX), None);
        assert_eq!(
            sheet.source_rect(0, 200_000_000, 1),
            Some(Rect::new(0, 0, 1_600_000_000, 8))
        );
    }

    #[test]
    fn test_placeholder_is_asymmetric() {
        let sheet = SpriteSheet::placeholder(CELL);
        let img = sheet.image();
        assert_eq!(img.get(0, 5), 1);
        assert_eq!(img.get(7, 5), 0);
        assert_eq!(img.get(8, 0), 2);
    }

    #[test]
    fn test_from_image_exact_mapping() {
        let palette = Palette::new(PICO8_PALETTE);
        let mut img = RgbaImage::new(8, 8);
        img.put_pixel(2, 3, image::Rgba([0xFF, 0x00, 0x4D, 255]));
        img.put_pixel(4, 4, image::Rgba([0x12, 0x34, 0x56, 0]));
        let sheet = SpriteSheet::from_image(&img, &palette, CELL).unwrap();
        assert_eq!(sheet.image().get(2, 3), 8);
        assert_eq!(sheet.image().get(4, 4), 0);
        assert_eq!(sheet.mask().get(4, 4), 0);
    }

    #[test]
    fn test_from_image_rejects_unknown_color() {
        let palette = Palette::new(PICO8_PALETTE);
        let mut img = RgbaImage::new(8, 8);
        img.put_pixel(1, 2, image::Rgba([1, 2, 3, 255]));
        let err = SpriteSheet::from_image(&img, &palette, CELL).unwrap_err();
        assert!(matches!(err, AssetError::UnknownColor { x: 1, y: 2, .. }));
    }

    #[test]
    fn test_load_png() {
        let palette = Palette::new(PICO8_PALETTE);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprites.png");
        let mut img = RgbaImage::new(16, 8);
        img.put_pixel(9, 0, image::Rgba([0xFF, 0xF1, 0xE8, 255]));
        img.save(&path).unwrap();

        let sheet = SpriteSheet::load(&path, &palette, CELL).unwrap();
        assert_eq!(sheet.width(), 16);
        assert_eq!(sheet.image().get(9, 0), 7);
        assert!(SpriteSheet::load(dir.path().join("missing.png"), &palette, CELL).is_err());
    }
}
