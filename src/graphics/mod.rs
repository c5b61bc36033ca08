//! Fantasy console graphics.
//!
//! Cartridges draw colour ids into a [`PixelSurface`]; the [`Engine`] owns
//! that surface along with the palette, font and sprite compositor, and
//! hands finished frames to the host through the presenter.

pub mod api;
pub mod bitmap;
pub mod color;
pub mod engine;
pub mod error;
pub mod font;
pub mod palette;
pub mod presenter;
pub mod raster;
pub mod sheet;
pub mod sprite;
pub mod sprite_cache;
pub mod surface;
pub mod transform;

pub use api::{Clearer, Drawer, GraphicsApi, Paletter, Peeker, Printer, Spriter};
pub use color::{ColorId, Rgba, PALETTE_SIZE};
pub use engine::{Assets, Engine};
pub use error::{AssetError, PaletteError};
pub use font::BitmapFont;
pub use palette::Palette;
pub use presenter::{FlipOutcome, FrameHandoff};
pub use sheet::SpriteSheet;
pub use surface::{CellSize, PixelSurface, Pos};
