//! Pixel colors

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bytes per pixel on the wire
pub const BYTES_PER_PIXEL: usize = 3;

/// 8-bit RGBA color
///
/// Alpha is carried for callers that compose colors; the strip has no alpha
/// channel and it is dropped on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// Wire encoding: green, red, blue
    pub const fn to_grb(self) -> [u8; BYTES_PER_PIXEL] {
        [self.g, self.r, self.b]
    }
}

impl From<(u8, u8, u8)> for Rgba {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}
