//! Colour primitives shared by the palette, presenter and asset loaders.

/// Index into the active palette.
pub type ColorId = u8;

/// Number of slots in every console palette.
pub const PALETTE_SIZE: usize = 16;

/// Colour index treated as transparent when deriving sprite masks.
pub const TRANSPARENT_INDEX: ColorId = 0;

/// True-colour value with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque colour from a `0xRRGGBB` literal.
    pub const fn from_hex(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_array(px: [u8; 4]) -> Self {
        Self::with_alpha(px[0], px[1], px[2], px[3])
    }

    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Same colour with its alpha replaced.
    #[must_use]
    pub const fn alpha(self, a: u8) -> Self {
        Self::with_alpha(self.r, self.g, self.b, a)
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// Reduce an arbitrary drawing colour to a valid palette slot.
#[inline]
pub fn wrap_color(color: ColorId) -> ColorId {
    color % PALETTE_SIZE as ColorId
}
