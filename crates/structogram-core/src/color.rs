//! Color handling for Structogram diagrams
//!
//! This module provides the [`Color`] type used for the `color` attribute of
//! every diagram element. Colors are parsed with the `color` crate, so any CSS
//! color string is accepted, and are written the way Structorizer stores
//! them: six lowercase hex digits without a leading `#`.

use std::{fmt, str::FromStr};

use color::{DynamicColor, Srgb};

/// An opaque sRGB color as written into a Structorizer document.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    /// Plain white, the color of ordinary statements.
    pub const WHITE: Color = Color::from_rgb8(0xff, 0xff, 0xff);

    /// Create a new `Color` from a string.
    ///
    /// Accepts CSS color strings such as `"#ff0000"`, `"rgb(255, 0, 0)"` or
    /// `"red"`, and the bare six-digit hex form used inside Structorizer
    /// files (`"80ff80"`). Any alpha component is discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use structogram_core::color::Color;
    ///
    /// let green = Color::new("80ff80").unwrap();
    /// assert_eq!(green.to_string(), "80ff80");
    ///
    /// let red = Color::new("red").unwrap();
    /// assert_eq!(red.to_string(), "ff0000");
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        let trimmed = color_str.trim();
        let candidate = if is_bare_hex(trimmed) {
            format!("#{trimmed}")
        } else {
            trimmed.to_string()
        };

        match DynamicColor::from_str(&candidate) {
            Ok(color) => {
                let rgba = color.to_alpha_color::<Srgb>().to_rgba8();
                Ok(Self::from_rgb8(rgba.r, rgba.g, rgba.b))
            }
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Create a color from its red, green and blue components.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn is_bare_hex(s: &str) -> bool {
    matches!(s.len(), 3 | 6) && s.chars().all(|c| c.is_ascii_hexdigit())
}
