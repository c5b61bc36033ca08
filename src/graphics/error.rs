//! Error types for the rendering core.

use std::path::PathBuf;

use crate::graphics::color::{ColorId, Rgba};

/// Recoverable palette failures. Surface state is never touched when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaletteError {
    #[error("Color id {id} out of range (palette has {size} colors)")]
    OutOfRange { id: ColorId, size: usize },

    #[error("No palette entry matches {0} exactly")]
    NoExactMatch(Rgba),
}

/// Failures while loading the sprite sheet or font. These are fatal at
/// startup.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid {what} dimensions: {width}x{height}")]
    InvalidDimensions {
        what: &'static str,
        width: u32,
        height: u32,
    },

    #[error("Pixel data length {actual} does not match {width}x{height}")]
    LengthMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },

    #[error("Color {color} at ({x}, {y}) is not in the palette")]
    UnknownColor { x: u32, y: u32, color: Rgba },

    #[error("Color id {id} at ({x}, {y}) is out of range")]
    InvalidColorId { x: u32, y: u32, id: ColorId },
}
