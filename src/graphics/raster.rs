//! Primitive rasterisation onto a [`PixelSurface`].
//!
//! Integer-only algorithms: Bresenham lines with dedicated horizontal,
//! vertical and 45° cases, and midpoint circles. Arithmetic runs in `i64`
//! and spans are clipped to the surface, so any `i32` input is safe to draw.

use crate::graphics::color::ColorId;
use crate::graphics::surface::PixelSurface;

/// Plot one pixel.
#[inline]
pub fn pset(surface: &mut PixelSurface, x: i32, y: i32, color: ColorId) {
    surface.set(x, y, color);
}

/// Plot with wide coordinates; anything outside `i32` is off-surface anyway.
#[inline]
fn plot(surface: &mut PixelSurface, x: i64, y: i64, color: ColorId) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        surface.set(x, y, color);
    }
}

/// Inclusive span `a..=b` clipped to `0..len`, or `None` when it misses.
fn clip_span(a: i64, b: i64, len: i32) -> Option<(i32, i32)> {
    let (lo, hi) = (a.min(b).max(0), a.max(b).min(len as i64 - 1));
    (lo <= hi).then_some((lo as i32, hi as i32))
}

/// Draw a line with both endpoints inclusive.
pub fn line(
    surface: &mut PixelSurface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    color: ColorId,
) {
    // p1 -> p2 equals p2 -> p1, so only left-to-right needs handling
    let (x1, y1, x2, y2) = if x1 > x2 {
        (x2 as i64, y2 as i64, x1 as i64, y1 as i64)
    } else {
        (x1 as i64, y1 as i64, x2 as i64, y2 as i64)
    };

    let dx = x2 - x1;
    let dy = (y2 - y1).abs();

    if dx == 0 && dy == 0 {
        plot(surface, x1, y1, color);
    } else if dy == 0 {
        if y1 < 0 || y1 >= surface.height() as i64 {
            return;
        }
        if let Some((lo, hi)) = clip_span(x1, x2, surface.width()) {
            for x in lo..=hi {
                surface.set(x, y1 as i32, color);
            }
        }
    } else if dx == 0 {
        if x1 < 0 || x1 >= surface.width() as i64 {
            return;
        }
        if let Some((lo, hi)) = clip_span(y1, y2, surface.height()) {
            for y in lo..=hi {
                surface.set(x1 as i32, y, color);
            }
        }
    } else if dx == dy {
        let step = if y1 < y2 { 1 } else { -1 };
        let Some((lo, hi)) = clip_steps(x1, 1, dx, surface.width()) else {
            return;
        };
        for k in lo..=hi {
            plot(surface, x1 + k, y1 + step * k, color);
        }
    } else if dx > dy {
        // wider than high
        let step = if y1 < y2 { 1 } else { -1 };
        let Some((lo, hi)) = clip_steps(x1, 1, dx, surface.width()) else {
            return;
        };
        for k in lo..=hi {
            plot(surface, x1 + k, y1 + step * minor_offset(k, dx, dy), color);
        }
    } else {
        // higher than wide
        let step = if y1 < y2 { 1 } else { -1 };
        let Some((lo, hi)) = clip_steps(y1, step, dy, surface.height()) else {
            return;
        };
        for k in lo..=hi {
            plot(surface, x1 + minor_offset(k, dy, dx), y1 + step * k, color);
        }
    }
}

/// Steps `k` in `0..=steps` for which `start + dir * k` lies in `0..len`.
fn clip_steps(start: i64, dir: i64, steps: i64, len: i32) -> Option<(i64, i64)> {
    let last = len as i64 - 1;
    let (lo, hi) = if dir > 0 {
        ((-start).max(0), steps.min(last - start))
    } else {
        ((start - last).max(0), steps.min(start))
    };
    (lo <= hi).then_some((lo, hi))
}

/// Minor-axis offset after `k` major steps of a Bresenham walk.
///
/// The walk starts with error `major` and per step subtracts `2 * minor`,
/// adding `2 * major` with each minor step, which keeps the error in
/// `0..2 * major`. The offset is therefore the smallest `m` with
/// `major - 2 * minor * k + 2 * major * m >= 0`.
fn minor_offset(k: i64, major: i64, minor: i64) -> i64 {
    let num = 2 * minor as i128 * k as i128 - major as i128;
    let den = 2 * major as i128;
    // ceiling division; den is positive
    (num + den - 1).div_euclid(den) as i64
}

/// Rectangle outline through four lines.
pub fn rect(surface: &mut PixelSurface, x0: i32, y0: i32, x1: i32, y1: i32, color: ColorId) {
    line(surface, x0, y0, x1, y0, color);
    line(surface, x1, y0, x1, y1, color);
    line(surface, x1, y1, x0, y1, color);
    line(surface, x0, y1, x0, y0, color);
}

/// Filled rectangle: one vertical line per column in `x0..x1`.
///
/// Half-open in x, inclusive in y. Columns off the surface are skipped.
pub fn rect_fill(surface: &mut PixelSurface, x0: i32, y0: i32, x1: i32, y1: i32, color: ColorId) {
    for x in x0.max(0)..x1.min(surface.width()) {
        line(surface, x, y0, x, y1, color);
    }
}

/// Where a circle of radius `r` sits relative to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CircleReach {
    /// Bounding box misses the surface entirely.
    Outside,
    /// Every surface pixel lies strictly inside the outline.
    Covers,
    Partial,
}

fn circle_reach(surface: &PixelSurface, cx: i32, cy: i32, r: i32) -> CircleReach {
    let (cx, cy, r) = (cx as i64, cy as i64, r as i64);
    let (w, h) = (surface.width() as i64, surface.height() as i64);
    let reach = r.abs();
    if cx + reach < 0 || cy + reach < 0 || cx - reach >= w || cy - reach >= h {
        return CircleReach::Outside;
    }
    // midpoint outlines stray less than one pixel from the true radius
    let inner = (r - 2) as i128;
    if inner > 0 {
        let covers = [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)]
            .iter()
            .all(|&(x, y)| {
                let (dx, dy) = ((x - cx) as i128, (y - cy) as i128);
                dx * dx + dy * dy < inner * inner
            });
        if covers {
            return CircleReach::Covers;
        }
    }
    CircleReach::Partial
}

/// Radius above which circles are drawn by scanning surface rows and
/// columns instead of walking every octant step.
const SCAN_RADIUS: i64 = 1 << 14;

fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Half-chord of a circle of radius `r` at distance `d` from its centre.
fn half_chord(r: i64, d: i64) -> Option<i64> {
    let d = d.abs();
    (d <= r).then(|| isqrt((r * r - d * d) as u64) as i64)
}

/// Walk the midpoint circle, handing each (x, y) octant step to `plot`.
fn midpoint_circle(r: i32, mut plot: impl FnMut(i64, i64)) {
    let r = r as i64;
    let mut x = 0;
    let mut y = r;
    let mut p = (5 - r * 4) / 4;

    plot(x, y);
    while x < y {
        x += 1;
        if p < 0 {
            p += 2 * x + 1;
        } else {
            y -= 1;
            p += 2 * (x - y) + 1;
        }
        plot(x, y);
    }
}

/// Circle outline centred on (cx, cy).
pub fn circle(surface: &mut PixelSurface, cx: i32, cy: i32, r: i32, color: ColorId) {
    if circle_reach(surface, cx, cy, r) != CircleReach::Partial {
        return;
    }
    let (cx, cy, r) = (cx as i64, cy as i64, r as i64);
    if r > SCAN_RADIUS {
        for y in 0..surface.height() as i64 {
            if let Some(hw) = half_chord(r, y - cy) {
                plot(surface, cx - hw, y, color);
                plot(surface, cx + hw, y, color);
            }
        }
        for x in 0..surface.width() as i64 {
            if let Some(hh) = half_chord(r, x - cx) {
                plot(surface, x, cy - hh, color);
                plot(surface, x, cy + hh, color);
            }
        }
        return;
    }
    midpoint_circle(r as i32, |x, y| circle_points(surface, cx, cy, x, y, color));
}

fn circle_points(surface: &mut PixelSurface, cx: i64, cy: i64, x: i64, y: i64, color: ColorId) {
    if x == 0 {
        plot(surface, cx, cy + y, color);
        plot(surface, cx, cy - y, color);
        plot(surface, cx + y, cy, color);
        plot(surface, cx - y, cy, color);
    } else if x == y {
        plot(surface, cx + x, cy + y, color);
        plot(surface, cx - x, cy + y, color);
        plot(surface, cx + x, cy - y, color);
        plot(surface, cx - x, cy - y, color);
    } else if x < y {
        plot(surface, cx + x, cy + y, color);
        plot(surface, cx - x, cy + y, color);
        plot(surface, cx + x, cy - y, color);
        plot(surface, cx - x, cy - y, color);
        plot(surface, cx + y, cy + x, color);
        plot(surface, cx - y, cy + x, color);
        plot(surface, cx + y, cy - x, color);
        plot(surface, cx - y, cy - x, color);
    }
}

/// Horizontal span in wide coordinates, clipped before drawing.
fn hspan(surface: &mut PixelSurface, xa: i64, xb: i64, y: i64, color: ColorId) {
    if y < 0 || y >= surface.height() as i64 {
        return;
    }
    if let Some((lo, hi)) = clip_span(xa, xb, surface.width()) {
        for x in lo..=hi {
            surface.set(x, y as i32, color);
        }
    }
}

/// Filled circle from symmetric horizontal spans.
pub fn circle_fill(surface: &mut PixelSurface, cx: i32, cy: i32, r: i32, color: ColorId) {
    match circle_reach(surface, cx, cy, r) {
        CircleReach::Outside => return,
        CircleReach::Covers => {
            surface.fill(color);
            return;
        }
        CircleReach::Partial => {}
    }
    let (cx, cy) = (cx as i64, cy as i64);
    if r as i64 > SCAN_RADIUS {
        for y in 0..surface.height() as i64 {
            if let Some(hw) = half_chord(r as i64, y - cy) {
                hspan(surface, cx - hw, cx + hw, y, color);
            }
        }
        return;
    }
    midpoint_circle(r, |x, y| {
        hspan(surface, cx - x, cx + x, cy + y, color);
        hspan(surface, cx - x, cx + x, cy - y, color);
        hspan(surface, cx - y, cx + y, cy + x, color);
        hspan(surface, cx - y, cx + y, cy - x, color);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const C: ColorId = 7;

    fn surface() -> PixelSurface {
        PixelSurface::new(32, 32).unwrap()
    }

    fn lit(s: &PixelSurface) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..s.height() {
            for x in 0..s.width() {
                if s.get(x, y) == Some(C) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_line_single_point() {
        let mut s = surface();
        line(&mut s, 3, 4, 3, 4, C);
        assert_eq!(lit(&s), vec![(3, 4)]);
    }

    #[test]
    fn test_line_horizontal_inclusive() {
        let mut s = surface();
        line(&mut s, 0, 0, 5, 0, C);
        assert_eq!(lit(&s), (0..=5).map(|x| (x, 0)).collect::<Vec<_>>());
    }

    #[test]
    fn test_line_vertical_inclusive() {
        let mut s = surface();
        line(&mut s, 0, 5, 0, 0, C);
        assert_eq!(lit(&s), (0..=5).map(|y| (0, y)).collect::<Vec<_>>());
    }

    #[rstest]
    #[case(0, 0, 4, 4)]
    #[case(4, 4, 0, 0)]
    #[case(0, 4, 4, 0)]
    fn test_line_diagonal(#[case] x0: i32, #[case] y0: i32, #[case] x1: i32, #[case] y1: i32) {
        let mut s = surface();
        line(&mut s, x0, y0, x1, y1, C);
        let pts = lit(&s);
        assert_eq!(pts.len(), 5);
        assert!(pts.contains(&(x0, y0)));
        assert!(pts.contains(&(x1, y1)));
    }

    #[rstest]
    #[case(1, 1, 10, 4)]
    #[case(10, 4, 1, 1)]
    #[case(1, 10, 4, 1)]
    #[case(2, 20, 9, 3)]
    fn test_line_general_slopes_one_pixel_per_major_step(
        #[case] x0: i32,
        #[case] y0: i32,
        #[case] x1: i32,
        #[case] y1: i32,
    ) {
        let mut s = surface();
        line(&mut s, x0, y0, x1, y1, C);
        let pts = lit(&s);
        let major = (x1 - x0).abs().max((y1 - y0).abs());
        assert_eq!(pts.len() as i32, major + 1);
        assert!(pts.contains(&(x0, y0)));
        assert!(pts.contains(&(x1, y1)));
    }

    #[test]
    fn test_line_clipped_off_surface() {
        let mut s = surface();
        line(&mut s, -5, 2, 3, 2, C);
        assert_eq!(lit(&s), (0..=3).map(|x| (x, 2)).collect::<Vec<_>>());
    }

    #[test]
    fn test_rect_outline() {
        let mut s = surface();
        rect(&mut s, 1, 1, 4, 3, C);
        let pts = lit(&s);
        // perimeter of a 4x3 box
        assert_eq!(pts.len(), 10);
        assert!(!pts.contains(&(2, 2)));
    }

    #[test]
    fn test_rect_fill_half_open_x() {
        let mut s = surface();
        rect_fill(&mut s, 0, 0, 4, 4, C);
        let pts = lit(&s);
        assert_eq!(pts.len(), 4 * 5);
        assert!(pts.iter().all(|&(x, y)| (0..4).contains(&x) && (0..=4).contains(&y)));
    }

    #[test]
    fn test_circle_zero_radius() {
        let mut s = surface();
        circle(&mut s, 5, 5, 0, C);
        assert_eq!(lit(&s), vec![(5, 5)]);
    }

    #[test]
    fn test_circle_is_symmetric() {
        let mut s = surface();
        circle(&mut s, 15, 15, 6, C);
        let pts = lit(&s);
        for &(x, y) in &pts {
            let (dx, dy) = (x - 15, y - 15);
            assert!(pts.contains(&(15 - dx, 15 + dy)));
            assert!(pts.contains(&(15 + dx, 15 - dy)));
            assert!(pts.contains(&(15 + dy, 15 + dx)));
        }
        assert!(pts.contains(&(15, 9)));
        assert!(pts.contains(&(21, 15)));
        assert!(!pts.contains(&(15, 15)));
    }

    #[rstest]
    #[case(-2_000_000_000, 5, 2_000_000_000, 5)]
    #[case(2_000_000_000, 5, -2_000_000_000, 5)]
    #[case(i32::MIN, 5, i32::MAX, 5)]
    fn test_line_horizontal_extreme_spans_row(
        #[case] x0: i32,
        #[case] y0: i32,
        #[case] x1: i32,
        #[case] y1: i32,
    ) {
        let mut s = surface();
        line(&mut s, x0, y0, x1, y1, C);
        assert_eq!(lit(&s), (0..32).map(|x| (x, 5)).collect::<Vec<_>>());
    }

    #[test]
    fn test_line_vertical_extreme_spans_column() {
        let mut s = surface();
        line(&mut s, 9, i32::MAX, 9, i32::MIN, C);
        assert_eq!(lit(&s), (0..32).map(|y| (9, y)).collect::<Vec<_>>());
    }

    #[test]
    fn test_line_steep_extreme_one_pixel_per_row() {
        let mut s = surface();
        line(&mut s, 0, -2_000_000_000, 1, 2_000_000_000, C);
        let pts = lit(&s);
        assert_eq!(pts.len(), 32);
        for y in 0..32 {
            assert!(pts.contains(&(0, y)) || pts.contains(&(1, y)), "row {} empty", y);
        }
    }

    #[test]
    fn test_line_far_off_surface_draws_nothing() {
        let mut s = surface();
        line(&mut s, i32::MIN, i32::MIN, i32::MAX, i32::MIN + 7, C);
        line(&mut s, -2_000_000_000, -2_000_000_000, -1_000_000_000, 2_000_000_000, C);
        assert!(lit(&s).is_empty());
    }

    #[test]
    fn test_clipped_line_matches_unclipped_walk() {
        // same slope as (2, 3) -> (17, 9), extended far to the left
        let mut near = surface();
        line(&mut near, 2, 3, 17, 9, C);
        let mut far = surface();
        line(&mut far, 2 - 15 * 1_000_000, 3 - 6 * 1_000_000, 17, 9, C);
        let far_pts = lit(&far);
        for p in lit(&near) {
            assert!(far_pts.contains(&p), "missing {:?}", p);
        }
    }

    #[test]
    fn test_rect_fill_extreme_bounds_fills_surface() {
        let mut s = surface();
        rect_fill(&mut s, i32::MIN, i32::MIN, i32::MAX, i32::MAX, C);
        assert_eq!(lit(&s).len(), 32 * 32);
    }

    #[test]
    fn test_huge_circle_around_surface() {
        let mut s = surface();
        circle(&mut s, 16, 16, 600_000_000, C);
        assert!(lit(&s).is_empty());
        circle_fill(&mut s, 16, 16, 600_000_000, C);
        assert_eq!(lit(&s).len(), 32 * 32);
    }

    #[test]
    fn test_huge_circle_edge_crossing_surface() {
        // top of the circle touches (16, 16)
        let (cx, cy, r) = (16, 1_000_000_016, 1_000_000_000);

        let mut s = surface();
        circle(&mut s, cx, cy, r, C);
        let pts = lit(&s);
        assert!(pts.contains(&(16, 16)));
        assert!(pts.iter().all(|&(_, y)| y == 16 || y == 17));

        let mut s = surface();
        circle_fill(&mut s, cx, cy, r, C);
        let pts = lit(&s);
        assert_eq!(pts.len(), 1 + 15 * 32);
        assert!(pts.iter().all(|&(x, y)| y >= 17 || (x, y) == (16, 16)));
    }

    #[test]
    fn test_circle_far_away_draws_nothing() {
        let mut s = surface();
        circle(&mut s, i32::MIN, i32::MAX, 5, C);
        circle_fill(&mut s, -2_000_000_000, 0, 1_000_000_000, C);
        circle(&mut s, i32::MAX, i32::MIN, i32::MAX, C);
        assert!(lit(&s).is_empty());
    }

    #[test]
    fn test_circle_fill_covers_outline_and_centre() {
        let mut outline = surface();
        circle(&mut outline, 15, 15, 5, C);
        let mut filled = surface();
        circle_fill(&mut filled, 15, 15, 5, C);
        let fill_pts = lit(&filled);
        for p in lit(&outline) {
            assert!(fill_pts.contains(&p), "missing outline point {:?}", p);
        }
        assert!(fill_pts.contains(&(15, 15)));
    }
}
