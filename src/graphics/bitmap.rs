//! Single-channel 8-bit planes.
//!
//! A [`Bitmap`] holds either colour identifiers (sprite images) or alpha
//! values (sprite masks). Both are row-major, one byte per pixel.

/// Axis-aligned rectangle in pixel coordinates, `x`/`y` inclusive and
/// `width`/`height` extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Overlap of two rectangles, `None` when they do not touch.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = (self.x as i64).max(other.x as i64);
        let y0 = (self.y as i64).max(other.y as i64);
        let x1 = (self.x as i64 + self.width as i64).min(other.x as i64 + other.width as i64);
        let y1 = (self.y as i64 + self.height as i64).min(other.y as i64 + other.height as i64);
        (x0 < x1 && y0 < y1)
            .then(|| Rect::new(x0 as i32, y0 as i32, (x1 - x0) as i32, (y1 - y0) as i32))
    }
}

/// Owned 8-bit image plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: i32,
    height: i32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Zero-filled plane. Negative extents are treated as empty.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Wrap existing row-major data. Returns `None` if the length is wrong.
    pub fn from_vec(width: i32, height: i32, data: Vec<u8>) -> Option<Self> {
        if width < 0 || height < 0 || data.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Value at a pixel, 0 outside the plane.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if self.contains(x, y) {
            self.data[self.index(x, y)]
        } else {
            0
        }
    }

    /// Write a pixel. Writes outside the plane are dropped.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        if self.contains(x, y) {
            let i = self.index(x, y);
            self.data[i] = value;
        }
    }

    /// Copy of a sub-rectangle. Areas outside the source read as 0.
    pub fn crop(&self, rect: Rect) -> Bitmap {
        let mut out = Bitmap::new(rect.width, rect.height);
        for y in 0..out.height {
            for x in 0..out.width {
                let v = self.get(rect.x.saturating_add(x), rect.y.saturating_add(y));
                let i = out.index(x, y);
                out.data[i] = v;
            }
        }
        out
    }

    /// Derive a new plane by mapping every value.
    pub fn map(&self, f: impl Fn(u8) -> u8) -> Bitmap {
        Bitmap {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_new_zeroed() {
        let bm = Bitmap::new(4, 3);
        assert_eq!(bm.width(), 4);
        assert_eq!(bm.height(), 3);
        assert!(bm.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_bitmap_negative_extent_is_empty() {
        let bm = Bitmap::new(-2, 5);
        assert_eq!(bm.width(), 0);
        assert!(bm.data().is_empty());
    }

    #[test]
    fn test_bitmap_from_vec_checks_length() {
        assert!(Bitmap::from_vec(2, 2, vec![1, 2, 3, 4]).is_some());
        assert!(Bitmap::from_vec(2, 2, vec![1, 2, 3]).is_none());
    }

    #[test]
    fn test_bitmap_set_get_clipped() {
        let mut bm = Bitmap::new(2, 2);
        bm.set(1, 1, 9);
        bm.set(2, 0, 9);
        bm.set(-1, 0, 9);
        assert_eq!(bm.get(1, 1), 9);
        assert_eq!(bm.get(5, 5), 0);
        assert_eq!(bm.data(), &[0, 0, 0, 9]);
    }

    #[test]
    fn test_bitmap_crop_pads_outside() {
        let bm = Bitmap::from_vec(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let c = bm.crop(Rect::new(1, 1, 3, 2));
        assert_eq!(c.data(), &[5, 6, 0, 0, 0, 0]);
    }

    #[test]
    fn test_bitmap_map() {
        let bm = Bitmap::from_vec(2, 1, vec![0, 3]).unwrap();
        let m = bm.map(|v| if v == 0 { 0 } else { 255 });
        assert_eq!(m.data(), &[0, 255]);
    }

    #[test]
    fn test_rect_is_empty() {
        assert!(Rect::new(0, 0, 0, 4).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn test_rect_intersect() {
        let sheet = Rect::new(0, 0, 16, 8);
        assert_eq!(
            Rect::new(8, 4, 16, 16).intersect(&sheet),
            Some(Rect::new(8, 4, 8, 4))
        );
        assert_eq!(Rect::new(16, 0, 4, 4).intersect(&sheet), None);
        assert_eq!(
            Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX).intersect(&sheet),
            None
        );
        assert_eq!(
            Rect::new(-4, 2, i32::MAX, i32::MAX).intersect(&sheet),
            Some(Rect::new(0, 2, 16, 6))
        );
    }
}
