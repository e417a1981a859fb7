// SPDX-License-Identifier: MIT
//
// Canonical hex colors.
//
// Every color that enters the token pipeline passes through `HexColor`
// first, so fingerprints, token values and exported CSS all agree on one
// spelling: `#RRGGBB`, uppercase, no alpha.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// An opaque sRGB color in canonical `#RRGGBB` form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    /// Pure black, the fallback for unreadable seed colors.
    pub const BLACK: Self = Self::from_rgb8(0, 0, 0);

    /// Pure white.
    pub const WHITE: Self = Self::from_rgb8(255, 255, 255);

    #[inline]
    #[must_use]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string.
    ///
    /// Accepts `RGB`, `RRGGBB` and `RRGGBBAA` with or without a leading `#`,
    /// ignoring surrounding whitespace. Alpha is discarded.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        let bytes = s.as_bytes();

        match bytes.len() {
            3 => {
                let r = parse_hex_digit(bytes[0])?;
                let g = parse_hex_digit(bytes[1])?;
                let b = parse_hex_digit(bytes[2])?;
                Some(Self::from_rgb8(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 | 8 => {
                if bytes.len() == 8 {
                    // Alpha must still be valid hex even though it is dropped.
                    parse_hex_byte(&bytes[6..8])?;
                }
                let r = parse_hex_byte(&bytes[0..2])?;
                let g = parse_hex_byte(&bytes[2..4])?;
                let b = parse_hex_byte(&bytes[4..6])?;
                Some(Self::from_rgb8(r, g, b))
            }
            _ => None,
        }
    }

    /// The 8-bit sRGB channels.
    #[inline]
    #[must_use]
    pub const fn rgb8(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// The hex digits without the leading `#`.
    #[must_use]
    pub fn digits(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Render as a CSS `hsl()` string, e.g. `hsl(264, 86%, 44%)`.
    ///
    /// Display only; nothing in the derivation reads this back.
    #[must_use]
    pub fn to_hsl_string(self) -> String {
        let (h, s, l) = self.to_hsl();
        format!("hsl({}, {}%, {}%)", round_to_u32(h), round_to_u32(s * 100.0), round_to_u32(l * 100.0))
    }

    /// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
    #[must_use]
    pub fn to_hsl(self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;

        if d.abs() < f64::EPSILON {
            return (0.0, 0.0, l);
        }

        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };

        let h = if (max - r).abs() < f64::EPSILON {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if (max - g).abs() < f64::EPSILON {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        ((h * 60.0) % 360.0, s, l)
    }
}

/// Validate and canonicalize a color string. `None` on invalid input.
#[must_use]
pub fn normalize_hex(input: &str) -> Option<HexColor> {
    HexColor::parse(input)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u32(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Debug for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Error returned when a string is not a hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color: {0:?}")]
pub struct InvalidHex(pub String);

impl FromStr for HexColor {
    type Err = InvalidHex;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidHex(s.to_string()))
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
