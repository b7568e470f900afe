//! Color representation and the few operations the theme engine needs.
//!
//! The theme engine treats colors as opaque CSS strings almost everywhere. This
//! type is only used where a value has to be *derived* from a legacy brand color:
//! hover shades and a readable foreground for text drawn on top of it.
//!
//! # Examples
//!
//! ```
//! use localsite_core::types::Color;
//!
//! let brand = Color::from_hex("#abc123").unwrap();
//! assert_eq!(brand.to_hex(), "#abc123");
//! assert_eq!(brand.contrast_foreground().to_hex(), "#000000");
//! assert_eq!(Color::from_hex("#F00").unwrap().to_hex(), "#ff0000");
//! ```

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Error type for color parsing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Missing the leading '#' or containing non-ASCII characters.
    #[error("Invalid hex color string format: '{0}'. Expected #RGB, #RGBA, #RRGGBB, or #RRGGBBAA.")]
    InvalidHexFormat(String),

    /// A component contained something other than hex digits.
    #[error("Invalid hex digit in '{input_str}': {source}")]
    InvalidHexDigit {
        input_str: String,
        #[source]
        source: ParseIntError,
    },

    /// Wrong number of characters after the '#'.
    #[error("Invalid hex color string length: '{0}'. Expected 3, 4, 6, or 8 characters after '#'.")]
    InvalidHexLength(String),
}

/// An RGBA color with components in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    /// Creates a new `Color`; components are clamped to `[0.0, 1.0]`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Creates a new `Color` from 8-bit RGBA components.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Parses "#RGB", "#RGBA", "#RRGGBB" or "#RRGGBBAA" (case-insensitive).
    pub fn from_hex(hex_str: &str) -> Result<Self, ColorParseError> {
        let input = hex_str.trim();
        let digits = match input.strip_prefix('#') {
            Some(digits) if digits.is_ascii() => digits,
            _ => return Err(ColorParseError::InvalidHexFormat(hex_str.to_string())),
        };

        let parse_component = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|e| ColorParseError::InvalidHexDigit {
                input_str: s.to_string(),
                source: e,
            })
        };
        // Short forms repeat each nibble: "f" -> 0xff.
        let parse_short = |s: &str| parse_component(s).map(|v| (v << 4) | v);

        match digits.len() {
            3 | 4 => {
                let r = parse_short(&digits[0..1])?;
                let g = parse_short(&digits[1..2])?;
                let b = parse_short(&digits[2..3])?;
                let a = if digits.len() == 4 { parse_short(&digits[3..4])? } else { 255 };
                Ok(Color::from_rgba8(r, g, b, a))
            }
            6 | 8 => {
                let r = parse_component(&digits[0..2])?;
                let g = parse_component(&digits[2..4])?;
                let b = parse_component(&digits[4..6])?;
                let a = if digits.len() == 8 { parse_component(&digits[6..8])? } else { 255 };
                Ok(Color::from_rgba8(r, g, b, a))
            }
            _ => Err(ColorParseError::InvalidHexLength(hex_str.to_string())),
        }
    }

    /// Converts the color channels to 8-bit values.
    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        (
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        )
    }

    /// Formats as lowercase "#rrggbb", or "#rrggbbaa" when not fully opaque.
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Linearly interpolates towards `other`; `factor` is clamped to `[0.0, 1.0]`.
    pub fn blend(&self, other: &Color, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let inv_factor = 1.0 - factor;

        Color::new(
            self.r * inv_factor + other.r * factor,
            self.g * inv_factor + other.g * factor,
            self.b * inv_factor + other.b * factor,
            self.a * inv_factor + other.a * factor,
        )
    }

    /// Mixes the color towards black by `amount`.
    pub fn darken(&self, amount: f32) -> Self {
        self.blend(&Color { a: self.a, ..Color::BLACK }, amount)
    }

    /// WCAG relative luminance of the color channels (alpha ignored).
    pub fn relative_luminance(&self) -> f32 {
        fn linearize(channel: f32) -> f32 {
            if channel <= 0.03928 {
                channel / 12.92
            } else {
                ((channel + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }

    /// Picks black or white, whichever reads better on top of this color.
    pub fn contrast_foreground(&self) -> Color {
        // Crossover where black and white have equal contrast ratio against the color.
        if self.relative_luminance() > 0.179 {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
