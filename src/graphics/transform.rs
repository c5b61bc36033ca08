//! 2D affine transforms for sprite flips and rotations.
//!
//! Matrices map source pixel space to destination pixel space:
//!
//! ```text
//! x' = xx * x + xy * y + x0
//! y' = yx * x + yy * y + y0
//! ```
//!
//! [`warp`] resamples a plane through the inverse of a matrix with
//! nearest-neighbour sampling at pixel centres, so the output has the same
//! extent as the input and anything that lands outside reads as 0.

use crate::graphics::bitmap::Bitmap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub xx: f64,
    pub xy: f64,
    pub x0: f64,
    pub yx: f64,
    pub yy: f64,
    pub y0: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        xx: 1.0,
        xy: 0.0,
        x0: 0.0,
        yx: 0.0,
        yy: 1.0,
        y0: 0.0,
    };

    pub const fn translate(dx: f64, dy: f64) -> Self {
        Affine {
            x0: dx,
            y0: dy,
            ..Self::IDENTITY
        }
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Affine {
            xx: sx,
            yy: sy,
            ..Self::IDENTITY
        }
    }

    /// Rotation by `radians` about the origin. With y pointing down this
    /// turns clockwise on screen.
    pub fn rotate(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Affine {
            xx: cos,
            xy: -sin,
            x0: 0.0,
            yx: sin,
            yy: cos,
            y0: 0.0,
        }
    }

    /// `self` applied after `first`.
    #[must_use]
    pub fn then(&self, first: &Affine) -> Affine {
        Affine {
            xx: self.xx * first.xx + self.xy * first.yx,
            xy: self.xx * first.xy + self.xy * first.yy,
            x0: self.xx * first.x0 + self.xy * first.y0 + self.x0,
            yx: self.yx * first.xx + self.yy * first.yx,
            yy: self.yx * first.xy + self.yy * first.yy,
            y0: self.yx * first.x0 + self.yy * first.y0 + self.y0,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.xx * self.yy - self.xy * self.yx
    }

    pub fn invert(&self) -> Option<Affine> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let xx = self.yy * inv;
        let xy = -self.xy * inv;
        let yx = -self.yx * inv;
        let yy = self.xx * inv;
        Some(Affine {
            xx,
            xy,
            x0: -(xx * self.x0 + xy * self.y0),
            yx,
            yy,
            y0: -(yx * self.x0 + yy * self.y0),
        })
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.xx * x + self.xy * y + self.x0,
            self.yx * x + self.yy * y + self.y0,
        )
    }

    /// Mirror about the vertical and/or horizontal centre line of a
    /// `width`×`height` box.
    pub fn mirror(flip_x: bool, flip_y: bool, width: i32, height: i32) -> Affine {
        let mut m = Self::IDENTITY;
        if flip_x {
            m = Self::translate(width as f64, 0.0).then(&Self::scale(-1.0, 1.0).then(&m));
        }
        if flip_y {
            m = Self::translate(0.0, height as f64).then(&Self::scale(1.0, -1.0).then(&m));
        }
        m
    }

    /// Rotation by `degrees` about (cx, cy).
    pub fn rotation_about(cx: f64, cy: f64, degrees: f64) -> Affine {
        let radians = degrees * std::f64::consts::PI / 180.0;
        Self::translate(cx, cy)
            .then(&Self::rotate(radians))
            .then(&Self::translate(-cx, -cy))
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Matrix for a sprite transform. Flips only apply when `rotation` is 0.
pub fn sprite_transform(
    width: i32,
    height: i32,
    rotation: i32,
    flip_x: bool,
    flip_y: bool,
) -> Affine {
    if rotation != 0 {
        Affine::rotation_about(width as f64 / 2.0, height as f64 / 2.0, rotation as f64)
    } else {
        Affine::mirror(flip_x, flip_y, width, height)
    }
}

/// Resample `src` through `m` into a new plane of the same size.
pub fn warp(src: &Bitmap, m: &Affine) -> Bitmap {
    let mut out = Bitmap::new(src.width(), src.height());
    let Some(inv) = m.invert() else {
        return out;
    };
    for y in 0..out.height() {
        for x in 0..out.width() {
            let (sx, sy) = inv.apply(x as f64 + 0.5, y as f64 + 0.5);
            let v = src.get(sx.floor() as i32, sy.floor() as i32);
            if v != 0 {
                out.set(x, y, v);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    fn numbered(w: i32, h: i32) -> Bitmap {
        let data = (0..w * h).map(|i| i as u8 + 1).collect();
        Bitmap::from_vec(w, h, data).unwrap()
    }

    #[test]
    fn test_identity_apply() {
        assert_eq!(Affine::IDENTITY.apply(3.0, 4.0), (3.0, 4.0));
    }

    #[test]
    fn test_invert_round_trip() {
        let m = Affine::rotation_about(4.0, 4.0, 33.0).then(&Affine::scale(2.0, 0.5));
        let inv = m.invert().unwrap();
        let p = m.apply(1.25, -3.0);
        assert!(approx(inv.apply(p.0, p.1), (1.25, -3.0)));
    }

    #[test]
    fn test_singular_matrix_has_no_inverse() {
        assert!(Affine::scale(0.0, 1.0).invert().is_none());
    }

    #[test]
    fn test_mirror_x() {
        let m = Affine::mirror(true, false, 8, 8);
        assert!(approx(m.apply(0.5, 2.0), (7.5, 2.0)));
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let m = Affine::rotation_about(4.0, 4.0, 90.0);
        // top-left corner swings to the top-right
        assert!(approx(m.apply(0.0, 0.0), (8.0, 0.0)));
    }

    #[test]
    fn test_sprite_transform_ignores_flip_when_rotated() {
        let rotated = sprite_transform(8, 8, 45, true, true);
        assert_eq!(rotated, Affine::rotation_about(4.0, 4.0, 45.0));
        let flipped = sprite_transform(8, 8, 0, true, false);
        assert_eq!(flipped, Affine::mirror(true, false, 8, 8));
    }

    #[test]
    fn test_warp_identity_is_copy() {
        let src = numbered(4, 3);
        assert_eq!(warp(&src, &Affine::IDENTITY), src);
    }

    #[test]
    fn test_warp_flip_x_reverses_rows() {
        let src = numbered(3, 2);
        let out = warp(&src, &Affine::mirror(true, false, 3, 2));
        assert_eq!(out.data(), &[3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_warp_flip_both() {
        let src = numbered(2, 2);
        let out = warp(&src, &Affine::mirror(true, true, 2, 2));
        assert_eq!(out.data(), &[4, 3, 2, 1]);
    }

    #[test]
    fn test_warp_quarter_turn() {
        let src = numbered(2, 2);
        let out = warp(&src, &Affine::rotation_about(1.0, 1.0, 90.0));
        // [1 2; 3 4] turned clockwise is [3 1; 4 2]
        assert_eq!(out.data(), &[3, 1, 4, 2]);
    }

    #[test]
    fn test_warp_clips_to_source_extent() {
        let src = numbered(4, 2);
        let out = warp(&src, &Affine::rotation_about(2.0, 1.0, 90.0));
        assert_eq!(out.width(), 4);
        assert_eq!(out.height(), 2);
        // corners sample from outside the source
        assert_eq!(out.get(0, 0), 0);
        assert_eq!(out.get(3, 1), 0);
    }
}
