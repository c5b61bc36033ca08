//! Frame presentation.
//!
//! `flip` turns the indexed surface into packed RGBA and hands it to the
//! host display through a [`FrameHandoff`]. At most one frame is pending:
//! while the host has not consumed the previous one, `flip` backs off
//! briefly and returns without converting anything.
//!
//! Palette lookups are hoisted out of the per-pixel loop into four
//! per-channel tables indexed by colour id. The tables are rebuilt only
//! when the palette version changes.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::graphics::color::{ColorId, PALETTE_SIZE};
use crate::graphics::error::AssetError;
use crate::graphics::palette::Palette;
use crate::graphics::surface::PixelSurface;

/// Per-channel RGBA tables indexed by colour id.
#[derive(Debug, Clone, Default)]
pub struct ColorLookup {
    r: [u8; PALETTE_SIZE],
    g: [u8; PALETTE_SIZE],
    b: [u8; PALETTE_SIZE],
    a: [u8; PALETTE_SIZE],
    version: Option<u32>,
}

impl ColorLookup {
    pub fn is_stale(&self, palette: &Palette) -> bool {
        self.version != Some(palette.version())
    }

    pub fn rebuild(&mut self, palette: &Palette) {
        for (i, color) in palette.colors().iter().enumerate() {
            self.r[i] = color.r;
            self.g[i] = color.g;
            self.b[i] = color.b;
            self.a[i] = color.a;
        }
        self.version = Some(palette.version());
    }

    /// Write `pixels` as packed RGBA into `out` (which must hold
    /// `pixels.len() * 4` bytes).
    pub fn convert(&self, pixels: &[ColorId], out: &mut [u8]) {
        for (id, px) in pixels.iter().zip(out.chunks_exact_mut(4)) {
            let i = *id as usize % PALETTE_SIZE;
            px[0] = self.r[i];
            px[1] = self.g[i];
            px[2] = self.b[i];
            px[3] = self.a[i];
        }
    }
}

/// The single-slot mailbox between the render thread and the host display.
#[derive(Debug)]
pub struct FrameHandoff {
    ready: AtomicBool,
    frame: Mutex<Vec<u8>>,
    width: i32,
    height: i32,
    consumed: AtomicU64,
}

impl FrameHandoff {
    pub fn new(width: i32, height: i32) -> Self {
        let len = (width.max(0) as usize) * (height.max(0) as usize) * 4;
        Self {
            ready: AtomicBool::new(false),
            frame: Mutex::new(vec![0; len]),
            width,
            height,
            consumed: AtomicU64::new(0),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// A presented frame is waiting to be consumed.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Number of frames the host has taken so far.
    pub fn consumed(&self) -> u64 {
        self.consumed.load(Ordering::Relaxed)
    }

    /// Hand the pending frame to `f` and clear the ready flag. Returns
    /// `None` when nothing is pending.
    pub fn consume<R>(&self, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
        if !self.is_ready() {
            return None;
        }
        let result = {
            let frame = self.frame.lock();
            f(frame.as_slice())
        };
        self.consumed.fetch_add(1, Ordering::Relaxed);
        self.ready.store(false, Ordering::Release);
        Some(result)
    }

    fn publish(&self, fill: impl FnOnce(&mut [u8])) {
        {
            let mut frame = self.frame.lock();
            fill(frame.as_mut_slice());
        }
        self.ready.store(true, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// A new frame was converted and published.
    Presented,
    /// The previous frame is still pending; nothing was converted.
    Deferred,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresenterStats {
    pub conversions: u64,
    pub deferred: u64,
    pub lookup_rebuilds: u64,
}

#[derive(Debug)]
pub struct Presenter {
    lookup: ColorLookup,
    handoff: Arc<FrameHandoff>,
    backoff: Duration,
    stats: PresenterStats,
}

impl Presenter {
    pub fn new(width: i32, height: i32, backoff: Duration) -> Self {
        Self {
            lookup: ColorLookup::default(),
            handoff: Arc::new(FrameHandoff::new(width, height)),
            backoff,
            stats: PresenterStats::default(),
        }
    }

    /// Shared handle for the host display thread.
    pub fn handoff(&self) -> Arc<FrameHandoff> {
        Arc::clone(&self.handoff)
    }

    pub fn stats(&self) -> PresenterStats {
        self.stats
    }

    pub fn flip(&mut self, surface: &PixelSurface, palette: &Palette) -> FlipOutcome {
        if self.handoff.is_ready() {
            if !self.backoff.is_zero() {
                std::thread::sleep(self.backoff);
            }
            self.stats.deferred += 1;
            log::trace!("flip deferred: previous frame not consumed");
            return FlipOutcome::Deferred;
        }

        self.refresh_lookup(palette);
        let lookup = &self.lookup;
        self.handoff
            .publish(|frame| lookup.convert(surface.pixels(), frame));
        self.stats.conversions += 1;
        FlipOutcome::Presented
    }

    /// Convert the surface into a fresh RGBA buffer without touching the
    /// handoff.
    pub fn snapshot(&mut self, surface: &PixelSurface, palette: &Palette) -> Vec<u8> {
        self.refresh_lookup(palette);
        let mut out = vec![0; surface.pixels().len() * 4];
        self.lookup.convert(surface.pixels(), &mut out);
        out
    }

    fn refresh_lookup(&mut self, palette: &Palette) {
        if self.lookup.is_stale(palette) {
            self.lookup.rebuild(palette);
            self.stats.lookup_rebuilds += 1;
        }
    }
}

/// Write packed RGBA to a PNG, nearest-neighbour scaled by `scale`.
pub fn save_png(
    path: &Path,
    rgba: Vec<u8>,
    width: u32,
    height: u32,
    scale: u32,
) -> Result<(), AssetError> {
    let actual = rgba.len();
    let image = image::RgbaImage::from_raw(width, height, rgba).ok_or(
        AssetError::LengthMismatch {
            width,
            height,
            actual,
        },
    )?;
    let scale = scale.max(1);
    let image = if scale == 1 {
        image
    } else {
        image::imageops::resize(
            &image,
            width * scale,
            height * scale,
            image::imageops::FilterType::Nearest,
        )
    };
    image.save(path).map_err(|source| AssetError::Encode {
        path: path.to_path_buf(),
        source,
    })
}
