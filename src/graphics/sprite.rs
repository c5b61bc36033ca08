//! Sprite compositing.
//!
//! Plain draws are a nearest-neighbour scale-blit straight from the sheet,
//! stencilled by the sheet mask. Flipped or rotated draws first build the
//! transformed sprite and mask (or fetch them from the [`TransformCache`])
//! and then go through the same scale-blit.

use crate::graphics::bitmap::{Bitmap, Rect};
use crate::graphics::sheet::SpriteSheet;
use crate::graphics::sprite_cache::{CachedTransform, TransformCache, TransformKey};
use crate::graphics::surface::PixelSurface;
use crate::graphics::transform::{sprite_transform, warp};

/// One sprite draw request.
///
/// `w`/`h` are in sheet cells, `dw`/`dh` in destination pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteDraw {
    pub n: i32,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub dw: i32,
    pub dh: i32,
    pub rotation: i32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl SpriteDraw {
    pub const fn new(n: i32, x: i32, y: i32, w: i32, h: i32, dw: i32, dh: i32) -> Self {
        Self {
            n,
            x,
            y,
            w,
            h,
            dw,
            dh,
            rotation: 0,
            flip_x: false,
            flip_y: false,
        }
    }

    #[must_use]
    pub const fn flipped(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }

    /// Rotation in whole degrees, any sign or magnitude.
    #[must_use]
    pub const fn rotated(mut self, degrees: i32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Cache key with the angle normalised into `0..360`.
    pub fn key(&self) -> TransformKey {
        TransformKey {
            sprite: self.n,
            width: self.w,
            height: self.h,
            dest_width: self.dw,
            dest_height: self.dh,
            rotation: self.rotation.rem_euclid(360),
            flip_x: self.flip_x,
            flip_y: self.flip_y,
        }
    }
}

#[derive(Debug)]
pub struct SpriteCompositor {
    sheet: SpriteSheet,
    cache: TransformCache,
}

impl SpriteCompositor {
    pub fn new(sheet: SpriteSheet, cache: TransformCache) -> Self {
        Self { sheet, cache }
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn cache(&self) -> &TransformCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut TransformCache {
        &mut self.cache
    }

    pub fn draw(&mut self, surface: &mut PixelSurface, req: &SpriteDraw) {
        if req.w <= 0 || req.h <= 0 || req.dw <= 0 || req.dh <= 0 {
            return;
        }
        let Some(src) = self.sheet.source_rect(req.n, req.w, req.h) else {
            return;
        };
        let Some((src, dest)) = clip_to_sheet(src, self.sheet.bounds(), req) else {
            return;
        };
        let key = req.key();

        if key.is_identity() {
            blit_scaled(surface, self.sheet.image(), self.sheet.mask(), src, dest);
            return;
        }

        if !self.cache.touch(&key) {
            let m = sprite_transform(src.width, src.height, key.rotation, key.flip_x, key.flip_y);
            let image = warp(&self.sheet.image().crop(src), &m);
            let mask = warp(&self.sheet.mask().crop(src), &m);
            log::trace!("transform cache miss: {:?}", key);
            self.cache.insert(key, CachedTransform::new(image, mask));
        }

        if let Some(entry) = self.cache.peek(&key) {
            let whole = Rect::new(0, 0, entry.image.width(), entry.image.height());
            blit_scaled(surface, &entry.image, &entry.mask, whole, dest);
        }
    }
}

/// Destination box of a blit, in wide coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DestBox {
    x: i64,
    y: i64,
    width: i64,
    height: i64,
}

/// Clip `src` to the sheet and shrink the destination box in proportion,
/// so the part that exists lands where it would have unclipped.
fn clip_to_sheet(src: Rect, sheet: Rect, req: &SpriteDraw) -> Option<(Rect, DestBox)> {
    let clipped = src.intersect(&sheet)?;
    let (x0, x1) = scaled_span(clipped.x, clipped.width, src.x, src.width, req.dw);
    let (y0, y1) = scaled_span(clipped.y, clipped.height, src.y, src.height, req.dh);
    let dest = DestBox {
        x: req.x as i64 + x0,
        y: req.y as i64 + y0,
        width: x1 - x0,
        height: y1 - y0,
    };
    (dest.width > 0 && dest.height > 0).then_some((clipped, dest))
}

/// Map the source span `lo..lo + len` of `start..start + extent` onto
/// `0..dest`.
fn scaled_span(lo: i32, len: i32, start: i32, extent: i32, dest: i32) -> (i64, i64) {
    let to_dest = |p: i64| (p - start as i64) * dest as i64 / extent as i64;
    (to_dest(lo as i64), to_dest(lo as i64 + len as i64))
}

/// Nearest-neighbour scale `src` of `image` into `dest`. Pixels whose mask
/// value is 0 are skipped; only the on-surface part of `dest` is walked.
fn blit_scaled(
    surface: &mut PixelSurface,
    image: &Bitmap,
    mask: &Bitmap,
    src: Rect,
    dest: DestBox,
) {
    if src.is_empty() || dest.width <= 0 || dest.height <= 0 {
        return;
    }
    let (sw, sh) = (surface.width() as i64, surface.height() as i64);
    let (dx0, dx1) = ((-dest.x).max(0), dest.width.min(sw - dest.x));
    let (dy0, dy1) = ((-dest.y).max(0), dest.height.min(sh - dest.y));

    for dy in dy0..dy1 {
        let sy = (src.y as i64 + dy * src.height as i64 / dest.height) as i32;
        let ty = (dest.y + dy) as i32;
        for dx in dx0..dx1 {
            let sx = (src.x as i64 + dx * src.width as i64 / dest.width) as i32;
            if mask.get(sx, sy) != 0 {
                surface.set((dest.x + dx) as i32, ty, image.get(sx, sy));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::surface::CellSize;

    const CELL: CellSize = CellSize::new(2, 2);

    // 4x2 sheet: sprite 0 = [1 2; 3 0], sprite 1 = [5 6; 7 8]
    fn compositor() -> SpriteCompositor {
        let ids = vec![1, 2, 5, 6, 3, 0, 7, 8];
        let sheet = SpriteSheet::from_indices(4, 2, ids, CELL).unwrap();
        SpriteCompositor::new(sheet, TransformCache::default())
    }

    fn surface() -> PixelSurface {
        let mut s = PixelSurface::new(8, 8).unwrap();
        s.fill(9);
        s
    }

    fn block(s: &PixelSurface, x: i32, y: i32, w: i32, h: i32) -> Vec<u8> {
        let mut out = Vec::new();
        for yy in y..y + h {
            for xx in x..x + w {
                out.push(s.get(xx, yy).unwrap_or(255));
            }
        }
        out
    }

    #[test]
    fn test_plain_draw_respects_mask() {
        let mut c = compositor();
        let mut s = surface();
        c.draw(&mut s, &SpriteDraw::new(0, 1, 1, 1, 1, 2, 2));
        assert_eq!(block(&s, 1, 1, 2, 2), vec![1, 2, 3, 9]);
        assert!(c.cache().is_empty());
    }

    #[test]
    fn test_plain_draw_scales_nearest() {
        let mut c = compositor();
        let mut s = surface();
        c.draw(&mut s, &SpriteDraw::new(1, 0, 0, 1, 1, 4, 4));
        assert_eq!(
            block(&s, 0, 0, 4, 4),
            vec![5, 5, 6, 6, 5, 5, 6, 6, 7, 7, 8, 8, 7, 7, 8, 8]
        );
    }

    #[test]
    fn test_multi_cell_source() {
        let mut c = compositor();
        let mut s = surface();
        c.draw(&mut s, &SpriteDraw::new(0, 0, 0, 2, 1, 4, 2));
        assert_eq!(block(&s, 0, 0, 4, 2), vec![1, 2, 5, 6, 3, 9, 7, 8]);
    }

    #[test]
    fn test_flip_x_uses_cache() {
        let mut c = compositor();
        let mut s = surface();
        c.draw(&mut s, &SpriteDraw::new(0, 0, 0, 1, 1, 2, 2).flipped(true, false));
        assert_eq!(block(&s, 0, 0, 2, 2), vec![2, 1, 9, 3]);
        assert_eq!(c.cache().len(), 1);
    }

    #[test]
    fn test_rotation_ignores_flip() {
        let mut c = compositor();
        let mut a = surface();
        let mut b = surface();
        c.draw(&mut a, &SpriteDraw::new(1, 0, 0, 1, 1, 2, 2).rotated(90));
        c.draw(
            &mut b,
            &SpriteDraw::new(1, 0, 0, 1, 1, 2, 2).rotated(90).flipped(true, true),
        );
        assert_eq!(block(&a, 0, 0, 2, 2), vec![7, 5, 8, 6]);
        assert_eq!(block(&a, 0, 0, 2, 2), block(&b, 0, 0, 2, 2));
        // flip flags are still part of the key
        assert_eq!(c.cache().len(), 2);
    }

    #[test]
    fn test_full_turn_is_identity() {
        let mut c = compositor();
        let mut s = surface();
        c.draw(&mut s, &SpriteDraw::new(1, 0, 0, 1, 1, 2, 2).rotated(360));
        assert!(c.cache().is_empty());
        assert_eq!(SpriteDraw::new(0, 0, 0, 1, 1, 1, 1).rotated(-4).key().rotation, 356);
    }

    #[test]
    fn test_clipped_draw() {
        let mut c = compositor();
        let mut s = surface();
        c.draw(&mut s, &SpriteDraw::new(1, -1, 7, 1, 1, 2, 2));
        assert_eq!(s.get(0, 7), Some(6));
        assert_eq!(s.pixels().iter().filter(|&&p| p != 9).count(), 1);
    }

    #[test]
    fn test_huge_block_and_dest_do_not_panic() {
        let mut c = compositor();
        let mut s = surface();
        c.draw(&mut s, &SpriteDraw::new(0, 0, 0, 300_000_000, 1, 8, 8));
        c.draw(&mut s, &SpriteDraw::new(0, 0, 0, i32::MAX, i32::MAX, 8, 8));
        c.draw(
            &mut s,
            &SpriteDraw::new(0, 0, 0, 1_000_000_000, 1, 8, 8).rotated(90),
        );
        assert!(s.pixels().iter().all(|&p| p == 9));
        assert!(c.cache().is_empty());
    }

    #[test]
    fn test_huge_dest_is_clipped_to_surface() {
        let mut c = compositor();
        let mut s = surface();
        c.draw(&mut s, &SpriteDraw::new(0, 0, 0, 2, 1, i32::MAX, 8));
        assert_eq!(block(&s, 0, 0, 8, 4), vec![1; 32]);
        assert_eq!(block(&s, 0, 4, 8, 4), vec![3; 32]);

        // rotated sprite 0 is [3 1; 0 2], the top-left pixel fills the view
        let mut s = surface();
        c.draw(
            &mut s,
            &SpriteDraw::new(0, 0, 0, 1, 1, i32::MAX, i32::MAX).rotated(90),
        );
        assert!(s.pixels().iter().all(|&p| p == 3));

        let mut s = surface();
        let far = SpriteDraw::new(0, i32::MIN, i32::MIN, 1, 1, i32::MAX, i32::MAX);
        c.draw(&mut s, &far);
        assert!(s.pixels().iter().all(|&p| p == 9));
    }

    #[test]
    fn test_block_past_sheet_edge_keeps_geometry() {
        let mut c = compositor();

        // sprite 1 is the last column pair, so the right half of a 2-wide
        // block is off the sheet and its destination half stays untouched
        let mut s = surface();
        c.draw(&mut s, &SpriteDraw::new(1, 0, 0, 2, 1, 4, 2));
        assert_eq!(block(&s, 0, 0, 4, 2), vec![5, 6, 9, 9, 7, 8, 9, 9]);

        let mut s = surface();
        c.draw(&mut s, &SpriteDraw::new(1, 0, 0, 2, 1, 4, 2).rotated(90));
        assert_eq!(block(&s, 0, 0, 4, 2), vec![7, 5, 9, 9, 8, 6, 9, 9]);
    }

    #[test]
    fn test_degenerate_sizes_draw_nothing() {
        let mut c = compositor();
        let mut s = surface();
        c.draw(&mut s, &SpriteDraw::new(0, 0, 0, 0, 1, 2, 2));
        c.draw(&mut s, &SpriteDraw::new(0, 0, 0, 1, 1, 0, 2));
        assert!(s.pixels().iter().all(|&p| p == 9));
    }
}
