//! The rendering engine: one explicitly owned bundle of surface, palette,
//! font, sprite compositor and presenter per console session.

use std::path::Path;
use std::sync::Arc;

use crate::config::ConsoleConfig;
use crate::console::ConsoleError;
use crate::graphics::api::{Clearer, Drawer, GraphicsApi, Paletter, Peeker, Printer, Spriter};
use crate::graphics::color::{ColorId, Rgba};
use crate::graphics::error::{AssetError, PaletteError};
use crate::graphics::font::BitmapFont;
use crate::graphics::palette::{Palette, PaletteColors};
use crate::graphics::presenter::{save_png, FlipOutcome, FrameHandoff, Presenter, PresenterStats};
use crate::graphics::raster;
use crate::graphics::sheet::SpriteSheet;
use crate::graphics::sprite::{SpriteCompositor, SpriteDraw};
use crate::graphics::sprite_cache::TransformCache;
use crate::graphics::surface::{PixelSurface, Pos};

/// Startup assets.
#[derive(Debug, Clone)]
pub struct Assets {
    pub sheet: SpriteSheet,
    pub font: BitmapFont,
}

impl Assets {
    /// Generated sprite sheet and the built-in font.
    pub fn builtin(config: &ConsoleConfig) -> Self {
        Self {
            sheet: SpriteSheet::placeholder(config.sprite_cell),
            font: BitmapFont::builtin(),
        }
    }

    /// Load whichever assets have a path, falling back to the built-ins
    /// for the rest.
    pub fn load(
        config: &ConsoleConfig,
        sprites: Option<&Path>,
        font: Option<&Path>,
    ) -> Result<Self, AssetError> {
        let sheet = match sprites {
            Some(path) => {
                let palette = Palette::new(config.palette);
                SpriteSheet::load(path, &palette, config.sprite_cell)?
            }
            None => SpriteSheet::placeholder(config.sprite_cell),
        };
        let font = match font {
            Some(path) => BitmapFont::load(path)?,
            None => BitmapFont::builtin(),
        };
        Ok(Self { sheet, font })
    }
}

#[derive(Debug)]
pub struct Engine {
    config: ConsoleConfig,
    surface: PixelSurface,
    palette: Palette,
    font: BitmapFont,
    sprites: SpriteCompositor,
    presenter: Presenter,
}

impl Engine {
    pub fn new(config: ConsoleConfig, assets: Assets) -> Result<Self, ConsoleError> {
        let mut surface = PixelSurface::new(config.width, config.height)?;
        surface.set_bg(config.bg);
        surface.set_fg(config.fg);
        surface.fill(config.bg);

        let cache = TransformCache::new(config.cache_max_entries, config.cache_max_age);
        let presenter = Presenter::new(config.width, config.height, config.flip_backoff);

        log::info!(
            "Engine ready: {} {}x{}, font cell {}x{}, {} fps",
            config.console_type,
            config.width,
            config.height,
            config.cell.width,
            config.cell.height,
            config.fps
        );

        Ok(Self {
            palette: Palette::new(config.palette),
            surface,
            font: assets.font,
            sprites: SpriteCompositor::new(assets.sheet, cache),
            presenter,
            config,
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn font(&self) -> &BitmapFont {
        &self.font
    }

    pub fn compositor(&self) -> &SpriteCompositor {
        &self.sprites
    }

    pub fn presenter_stats(&self) -> PresenterStats {
        self.presenter.stats()
    }

    /// Shared handle the host display thread consumes frames from.
    pub fn handoff(&self) -> Arc<FrameHandoff> {
        self.presenter.handoff()
    }

    /// Present the current surface.
    pub fn flip(&mut self) -> FlipOutcome {
        self.presenter.flip(&self.surface, &self.palette)
    }

    /// The current surface as packed RGBA, independent of presentation.
    pub fn frame_rgba(&mut self) -> Vec<u8> {
        self.presenter.snapshot(&self.surface, &self.palette)
    }

    pub fn save_screenshot(&mut self, path: &Path, scale: u32) -> Result<(), AssetError> {
        let rgba = self.frame_rgba();
        save_png(
            path,
            rgba,
            self.surface.width() as u32,
            self.surface.height() as u32,
            scale,
        )?;
        log::info!("Saved screenshot to {} (scale {})", path.display(), scale);
        Ok(())
    }

    fn draw_sprite(&mut self, req: SpriteDraw) {
        self.sprites.draw(&mut self.surface, &req);
    }
}

impl Clearer for Engine {
    fn cls(&mut self) {
        self.surface.fill(self.surface.bg());
    }

    fn cls_with_color(&mut self, color: ColorId) {
        self.surface.set_bg(color);
        self.cls();
    }
}

impl Drawer for Engine {
    fn set_color(&mut self, color: ColorId) {
        self.surface.set_fg(color);
    }

    fn color(&self) -> ColorId {
        self.surface.fg()
    }

    fn pset(&mut self, x: i32, y: i32) {
        let c = self.surface.fg();
        raster::pset(&mut self.surface, x, y, c);
    }

    fn pset_with_color(&mut self, x: i32, y: i32, color: ColorId) {
        self.set_color(color);
        self.pset(x, y);
    }

    fn pget(&self, x: i32, y: i32) -> ColorId {
        let Some(stored) = self.surface.get(x, y) else {
            return 0;
        };
        let shown = self.palette.color_unchecked(stored);
        self.palette.color_id(shown).unwrap_or(stored)
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let c = self.surface.fg();
        raster::line(&mut self.surface, x0, y0, x1, y1, c);
    }

    fn line_with_color(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: ColorId) {
        self.set_color(color);
        self.line(x0, y0, x1, y1);
    }

    fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let c = self.surface.fg();
        raster::rect(&mut self.surface, x0, y0, x1, y1, c);
    }

    fn rect_with_color(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: ColorId) {
        self.set_color(color);
        self.rect(x0, y0, x1, y1);
    }

    fn rect_fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let c = self.surface.fg();
        raster::rect_fill(&mut self.surface, x0, y0, x1, y1, c);
    }

    fn rect_fill_with_color(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: ColorId) {
        self.set_color(color);
        self.rect_fill(x0, y0, x1, y1);
    }

    fn circle(&mut self, x: i32, y: i32, r: i32) {
        let c = self.surface.fg();
        raster::circle(&mut self.surface, x, y, r, c);
    }

    fn circle_with_color(&mut self, x: i32, y: i32, r: i32, color: ColorId) {
        self.set_color(color);
        self.circle(x, y, r);
    }

    fn circle_fill(&mut self, x: i32, y: i32, r: i32) {
        let c = self.surface.fg();
        raster::circle_fill(&mut self.surface, x, y, r, c);
    }

    fn circle_fill_with_color(&mut self, x: i32, y: i32, r: i32, color: ColorId) {
        self.set_color(color);
        self.circle_fill(x, y, r);
    }
}

impl Paletter for Engine {
    fn palette_reset(&mut self) {
        self.palette.reset();
    }

    fn palette_copy(&self) -> Palette {
        self.palette.copy()
    }

    fn get_color(&self, color: ColorId) -> Result<Rgba, PaletteError> {
        self.palette.color(color)
    }

    fn get_color_id(&self, rgba: Rgba) -> Result<ColorId, PaletteError> {
        self.palette
            .color_id(rgba)
            .ok_or(PaletteError::NoExactMatch(rgba))
    }

    fn get_colors(&self) -> PaletteColors {
        *self.palette.colors()
    }

    fn map_color(&mut self, from: ColorId, to: ColorId) -> Result<(), PaletteError> {
        self.palette.map_color(from, to)
    }

    fn set_transparent(&mut self, color: ColorId, enabled: bool) -> Result<(), PaletteError> {
        self.palette.set_transparent(color, enabled)
    }
}

impl Peeker for Engine {
    fn peek(&self, addr: usize) -> ColorId {
        self.surface.get_index(addr).unwrap_or(0)
    }

    fn poke(&mut self, addr: usize, value: ColorId) {
        self.surface.set_index(addr, value);
    }
}

impl Printer for Engine {
    fn cursor(&mut self, x: i32, y: i32) {
        self.surface.set_cursor(Pos::new(x, y));
    }

    fn get_cursor(&self) -> Pos {
        self.surface.cursor()
    }

    fn print(&mut self, text: &str) {
        let at = self.config.cell.char_to_pixel(self.surface.cursor());
        let fg = self.surface.fg();
        self.print_at_with_color(text, at.x, at.y, fg);

        let mut cursor = self.surface.cursor();
        cursor.y = cursor.y.saturating_add(1);
        let last = self.config.char_rows() - 2;
        if cursor.y > last {
            self.scroll_up_line();
            cursor.y = last;
        }
        self.surface.set_cursor(cursor);
    }

    fn print_at(&mut self, text: &str, x: i32, y: i32) {
        let fg = self.surface.fg();
        self.print_at_with_color(text, x, y, fg);
    }

    fn print_at_with_color(&mut self, text: &str, x: i32, y: i32, color: ColorId) {
        self.set_color(color);
        let fg = self.surface.fg();
        self.font
            .draw_text(&mut self.surface, x, y, text, fg, self.config.cell);
        self.surface
            .set_cursor(self.config.cell.pixel_to_char(Pos::new(x, y)));
    }

    fn scroll_up_line(&mut self) {
        self.surface.scroll_up(self.config.cell.height);
    }
}

impl Spriter for Engine {
    fn sprite(&mut self, n: i32, x: i32, y: i32, w: i32, h: i32, dw: i32, dh: i32) {
        self.draw_sprite(SpriteDraw::new(n, x, y, w, h, dw, dh));
    }

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
    ) {
        self.draw_sprite(SpriteDraw::new(n, x, y, w, h, dw, dh).flipped(flip_x, flip_y));
    }

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
    ) {
        self.draw_sprite(SpriteDraw::new(n, x, y, w, h, dw, dh).rotated(rotation));
    }
}

impl GraphicsApi for Engine {
    fn width(&self) -> i32 {
        self.surface.width()
    }

    fn height(&self) -> i32 {
        self.surface.height()
    }
}
