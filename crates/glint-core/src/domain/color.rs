//! RGBA colour type and the blend primitives used by layer composition.
//!
//! Colours are four independent 8-bit channels.  Alpha is never
//! premultiplied; it is resolved explicitly either by a [`BlendMode`] while
//! compositing or by [`correct_with_alpha`] right before a device push.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a colour string cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string did not start with `#`.
    #[error("colour must start with '#': {0:?}")]
    MissingHash(String),
    /// The string was neither `#RRGGBB` nor `#RRGGBBAA`.
    #[error("colour must be #RRGGBB or #RRGGBBAA, got {0} hex digits")]
    BadLength(usize),
    /// A channel contained a non-hex character.
    #[error("invalid hex digits in colour {0:?}")]
    BadDigit(String),
}

/// An RGBA colour with exact channel equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Creates an opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds an opaque colour from unit-range float channels.
    ///
    /// Values outside `[0, 1]` are clamped.  Channels are truncated, matching
    /// how game telemetry usually reports team and HUD colours.
    pub fn from_unit_rgb(r: f64, g: f64, b: f64) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8;
        Self::rgb(channel(r), channel(g), channel(b))
    }

    /// Returns `true` when the red, green and blue channels are all zero.
    ///
    /// Alpha is ignored: some transports treat "off" as a hardware mode that is
    /// distinct from "displaying black", and the decision is made on RGB only.
    pub fn is_black(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if !hex.is_ascii() {
            return Err(ColorParseError::BadDigit(s.to_string()));
        }
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::BadLength(hex.len()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ColorParseError::BadDigit(s.to_string()))
        };
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Linearly interpolates every channel from `from` towards `to`.
///
/// `t` is clamped to `[0, 1]`; the endpoints return the inputs unchanged so
/// callers can rely on exact equality at the edges of a blend window.
pub fn blend(from: Color, to: Color, t: f64) -> Color {
    if t.is_nan() || t <= 0.0 {
        return from;
    }
    if t >= 1.0 {
        return to;
    }

    let mix = |a: u8, b: u8| (f64::from(a) * (1.0 - t) + f64::from(b) * t).round() as u8;
    Color::rgba(
        mix(from.r, to.r),
        mix(from.g, to.g),
        mix(from.b, to.b),
        mix(from.a, to.a),
    )
}

/// Folds alpha into the colour channels and returns an opaque colour.
///
/// Devices have no notion of transparency, so this runs once per push.
pub fn correct_with_alpha(color: Color) -> Color {
    let scale = |c: u8| (u16::from(c) * u16::from(color.a) / 255) as u8;
    Color::rgb(scale(color.r), scale(color.g), scale(color.b))
}

/// How a layer's colour combines with whatever lower layers produced for the
/// same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// The upper colour replaces the lower one.
    #[default]
    Overwrite,
    /// Per-channel saturating sum.
    Additive,
    /// Per-channel product, normalised to 0–255.
    Multiply,
    /// Source-over using the upper colour's alpha.
    AlphaOver,
}

impl BlendMode {
    /// Combines `above` onto `below`.
    pub fn apply(self, below: Color, above: Color) -> Color {
        match self {
            BlendMode::Overwrite => above,
            BlendMode::Additive => Color::rgba(
                below.r.saturating_add(above.r),
                below.g.saturating_add(above.g),
                below.b.saturating_add(above.b),
                below.a.saturating_add(above.a),
            ),
            BlendMode::Multiply => {
                let mul = |x: u8, y: u8| (u16::from(x) * u16::from(y) / 255) as u8;
                Color::rgba(
                    mul(below.r, above.r),
                    mul(below.g, above.g),
                    mul(below.b, above.b),
                    mul(below.a, above.a),
                )
            }
            BlendMode::AlphaOver => {
                let t = f64::from(above.a) / 255.0;
                let rgb = blend(below, above, t);
                let alpha = f64::from(above.a) + f64::from(below.a) * (1.0 - t);
                Color::rgba(rgb.r, rgb.g, rgb.b, alpha.round().min(255.0) as u8)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints_return_inputs_exactly() {
        let a = Color::rgb(10, 200, 30);
        let b = Color::rgb(250, 5, 90);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
    }

    #[test]
    fn test_blend_clamps_out_of_range_t() {
        let a = Color::GREEN;
        let b = Color::RED;
        assert_eq!(blend(a, b, -3.0), a);
        assert_eq!(blend(a, b, 7.5), b);
        assert_eq!(blend(a, b, f64::NAN), a);
    }

    #[test]
    fn test_blend_midpoint_rounds_channels() {
        let mid = blend(Color::GREEN, Color::RED, 0.5);
        assert_eq!(mid, Color::rgb(128, 128, 0));
    }

    #[test]
    fn test_correct_with_alpha_scales_rgb_and_is_opaque() {
        let c = correct_with_alpha(Color::rgba(200, 100, 50, 128));
        assert_eq!(c, Color::rgb(100, 50, 25));
        assert_eq!(correct_with_alpha(Color::rgb(1, 2, 3)), Color::rgb(1, 2, 3));
        assert_eq!(correct_with_alpha(Color::rgba(255, 255, 255, 0)), Color::BLACK);
    }

    #[test]
    fn test_is_black_ignores_alpha() {
        assert!(Color::rgba(0, 0, 0, 17).is_black());
        assert!(!Color::rgb(0, 0, 1).is_black());
    }

    #[test]
    fn test_from_unit_rgb_truncates_and_clamps() {
        assert_eq!(Color::from_unit_rgb(1.0, 0.5, -2.0), Color::rgb(255, 127, 0));
    }

    #[test]
    fn test_blend_mode_overwrite_takes_upper() {
        assert_eq!(BlendMode::Overwrite.apply(Color::RED, Color::BLUE), Color::BLUE);
    }

    #[test]
    fn test_blend_mode_additive_saturates() {
        let out = BlendMode::Additive.apply(Color::rgb(200, 10, 0), Color::rgb(100, 10, 5));
        assert_eq!(out, Color::rgb(255, 20, 5));
    }

    #[test]
    fn test_blend_mode_multiply_normalises() {
        let out = BlendMode::Multiply.apply(Color::rgb(255, 128, 0), Color::rgb(128, 255, 255));
        assert_eq!(out, Color::rgb(128, 128, 0));
    }

    #[test]
    fn test_blend_mode_alpha_over_respects_upper_alpha() {
        let opaque = BlendMode::AlphaOver.apply(Color::RED, Color::BLUE);
        assert_eq!(opaque, Color::BLUE);

        let invisible = BlendMode::AlphaOver.apply(Color::RED, Color::rgba(0, 0, 255, 0));
        assert_eq!(invisible, Color::RED);
    }

    #[test]
    fn test_parse_and_display_hex() {
        assert_eq!("#FF8000".parse::<Color>(), Ok(Color::rgb(255, 128, 0)));
        assert_eq!("#ff800040".parse::<Color>(), Ok(Color::rgba(255, 128, 0, 64)));
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_parse_rejects_malformed_strings() {
        assert!(matches!("FF8000".parse::<Color>(), Err(ColorParseError::MissingHash(_))));
        assert_eq!("#FFF".parse::<Color>(), Err(ColorParseError::BadLength(3)));
        assert!(matches!("#GG0000".parse::<Color>(), Err(ColorParseError::BadDigit(_))));
    }
}
