//! Colors and the fixed palettes used by the animations.
//!
//! Channels are stored as 8-bit values because every palette entry comes from
//! the site's CSS theme; alpha is a float in `0.0..=1.0` as in CSS `rgba()`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha value, clamped to `0.0..=1.0`.
    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Normalized `[r, g, b]` in `0.0..=1.0`.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// RGB with a straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Normalized `[r, g, b, a]` in `0.0..=1.0`.
    pub fn to_unit(self) -> [f32; 4] {
        let [r, g, b] = self.rgb().to_unit();
        [r, g, b, self.a]
    }

    /// CSS color string, e.g. `rgba(34, 211, 238, 0.12)`.
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        c.with_alpha(1.0)
    }
}

/// Blue theme used for the hero cells.
pub const CELL_PALETTE: [Rgb; 6] = [
    Rgb::new(14, 165, 233),  // primary blue
    Rgb::new(34, 211, 238),  // secondary cyan
    Rgb::new(59, 130, 246),  // accent blue
    Rgb::new(6, 182, 212),   // cyan
    Rgb::new(96, 165, 250),  // light blue
    Rgb::new(56, 189, 248),  // sky blue
];

/// Blob colors of the ambient gradient backdrop.
pub const BACKDROP_PALETTE: [Rgb; 4] = [
    Rgb::new(14, 165, 233),
    Rgb::new(34, 211, 238),
    Rgb::new(59, 130, 246),
    Rgb::new(6, 182, 212),
];

/// Page background, `#0a0f1c`.
pub const PAGE_BACKGROUND: Rgb = Rgb::new(10, 15, 28);
