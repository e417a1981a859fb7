// SPDX-License-Identifier: MIT
//
// tonal-color — OKLCH color model used to build tonal scales.
//
// Single-character variable names (r, g, b, l, c, h, a, s, m) are the
// standard mathematical convention in color science. Renaming them would
// make the code harder to compare against reference implementations.
#![allow(clippy::many_single_char_names)]
//
// Tonal scales have to look evenly spaced to a human, so every step of a
// ramp is computed in OKLCH and only converted to sRGB at the very end.
// Interpolating in raw RGB produces muddy midpoints and uneven lightness
// jumps; OKLCH keeps lightness steps perceptually equal and hue stable.
//
// Conversion pipeline:
//
//   OKLCH ↔ Oklab ↔ Linear sRGB ↔ sRGB ↔ HexColor
//
// Gamut mapping reduces chroma when OKLCH values fall outside sRGB.

use std::fmt;

use crate::hex::HexColor;

// ─── Color ───────────────────────────────────────────────────────────────────

/// A perceptual color stored in OKLCH space.
///
/// OKLCH is a cylindrical representation of the Oklab color space, designed
/// by Björn Ottosson. Equal numerical steps produce equal visual steps, which
/// is exactly what a tonal scale needs.
///
/// # Examples
///
/// ```
/// use tonal_color::{Color, HexColor};
///
/// let seed = HexColor::parse("#5d10d1").unwrap();
/// let violet = Color::from(seed);
///
/// // Walk halfway toward white in perceptual space.
/// let tint = violet.mix(&Color::WHITE, 0.5);
/// assert!(tint.l > violet.l);
/// ```
#[derive(Clone, Copy)]
pub struct Color {
    /// Lightness: 0.0 (black) to 1.0 (white).
    pub l: f32,

    /// Chroma (colorfulness): 0.0 (gray) to ~0.37 (most vivid).
    /// Unbounded in theory, but sRGB gamut limits practical values.
    pub c: f32,

    /// Hue angle in degrees: 0.0 to 360.0.
    pub h: f32,
}

impl Color {
    // ─── Constructors ────────────────────────────────────────────────────

    /// Create a color from OKLCH values.
    ///
    /// - `l`: Lightness, 0.0 to 1.0
    /// - `c`: Chroma, 0.0 to ~0.37
    /// - `h`: Hue angle in degrees, 0.0 to 360.0
    #[inline]
    #[must_use]
    pub const fn oklch(l: f32, c: f32, h: f32) -> Self {
        Self { l, c, h }
    }

    /// Create a color from sRGB values (0.0 to 1.0 range).
    #[must_use]
    pub fn srgb(r: f32, g: f32, b: f32) -> Self {
        let (l, c, h) = srgb_to_oklch(r, g, b);
        Self { l, c, h }
    }

    /// Create a color from 8-bit sRGB values (0 to 255).
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::srgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Pure black.
    pub const BLACK: Self = Self::oklch(0.0, 0.0, 0.0);

    /// Pure white.
    pub const WHITE: Self = Self::oklch(1.0, 0.0, 0.0);

    /// Whether this color is achromatic (no visible chroma).
    #[inline]
    #[must_use]
    pub fn is_achromatic(self) -> bool {
        self.c.abs() < 1e-5
    }

    /// Mix this color with another in OKLCH space.
    ///
    /// `t` = 0.0 returns `self`, `t` = 1.0 returns `other`.
    /// Hue interpolation takes the shortest path around the color wheel.
    #[must_use]
    pub fn mix(self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        // A gray endpoint has no meaningful hue; borrow the other one.
        let h = if self.is_achromatic() {
            other.h
        } else if other.is_achromatic() {
            self.h
        } else {
            interpolate_hue(self.h, other.h, t)
        };

        Self {
            l: self.l.mul_add(inv_t, other.l * t),
            c: self.c.mul_add(inv_t, other.c * t),
            h,
        }
    }

    // ─── Conversions to sRGB ─────────────────────────────────────────────

    /// Convert to sRGB with gamut mapping (values clamped to 0.0–1.0).
    #[must_use]
    pub fn to_srgb(self) -> (f32, f32, f32) {
        let (r, g, b) = oklch_to_srgb(self.l, self.c, self.h);
        (r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }

    /// Convert to 8-bit sRGB with gamut mapping.
    #[must_use]
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let (r, g, b) = self.to_srgb();
        (to_u8(r), to_u8(g), to_u8(b))
    }

    /// Convert to a canonical [`HexColor`].
    #[must_use]
    pub fn to_hex(self) -> HexColor {
        let (r, g, b) = self.to_rgb8();
        HexColor::from_rgb8(r, g, b)
    }

    /// Whether this color is within the sRGB gamut.
    #[must_use]
    pub fn in_srgb_gamut(self) -> bool {
        // Tolerate float noise from the LMS round-trip at the gamut edge.
        const EDGE: f32 = 1e-4;
        let (r, g, b) = oklch_to_srgb(self.l, self.c, self.h);
        let inside = |v: f32| (-EDGE..=1.0 + EDGE).contains(&v);
        inside(r) && inside(g) && inside(b)
    }

    /// Reduce chroma until this color fits within the sRGB gamut.
    ///
    /// Binary search for the maximum in-gamut chroma, keeping hue and
    /// lightness fixed.
    #[must_use]
    pub fn to_gamut(self) -> Self {
        if self.in_srgb_gamut() {
            return self;
        }

        let mut lo: f32 = 0.0;
        let mut hi: f32 = self.c;

        for _ in 0..16 {
            let mid = (lo + hi) * 0.5;
            let candidate = Self { c: mid, ..self };
            if candidate.in_srgb_gamut() {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        Self { c: lo, ..self }
    }
}

impl From<HexColor> for Color {
    fn from(hex: HexColor) -> Self {
        let (r, g, b) = hex.rgb8();
        Self::rgb8(r, g, b)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color::oklch({:.4}, {:.4}, {:.1})", self.l, self.c, self.h)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        const EPS: f32 = 1e-5;
        (self.l - other.l).abs() < EPS
            && (self.c - other.c).abs() < EPS
            && (self.is_achromatic()
                || other.is_achromatic()
                || hue_diff(self.h, other.h) < EPS)
    }
}

impl Default for Color {
    /// Default is black.
    fn default() -> Self {
        Self::BLACK
    }
}

// ─── Color Space Conversion Functions ────────────────────────────────────────
//
// Oklab color space math by Björn Ottosson.
// Reference: https://bottosson.github.io/posts/oklab/

/// Normalize a hue angle to the range [0, 360).
#[inline]
fn normalize_hue(h: f32) -> f32 {
    let h = h % 360.0;
    if h < 0.0 { h + 360.0 } else { h }
}

/// Absolute hue difference (shortest arc on the color wheel).
#[inline]
fn hue_diff(a: f32, b: f32) -> f32 {
    let d = (a - b).abs() % 360.0;
    if d > 180.0 { 360.0 - d } else { d }
}

/// Interpolate between two hue angles taking the shortest path.
#[inline]
fn interpolate_hue(h1: f32, h2: f32, t: f32) -> f32 {
    let diff = h2 - h1;
    let diff = if diff > 180.0 {
        diff - 360.0
    } else if diff < -180.0 {
        diff + 360.0
    } else {
        diff
    };
    normalize_hue(diff.mul_add(t, h1))
}

/// Convert OKLCH chroma and hue to Oklab a, b components.
#[inline]
fn oklch_to_oklab_ab(c: f32, h: f32) -> (f32, f32) {
    let h_rad = h.to_radians();
    (c * h_rad.cos(), c * h_rad.sin())
}

/// Convert Oklab a, b components to OKLCH chroma and hue.
#[inline]
fn oklab_ab_to_oklch(a: f32, b: f32) -> (f32, f32) {
    let c = a.hypot(b);
    let h = if c < 1e-8 {
        0.0 // Achromatic: hue is undefined, default to 0
    } else {
        let h = b.atan2(a).to_degrees();
        if h < 0.0 { h + 360.0 } else { h }
    };
    (c, h)
}

/// Convert Oklab (L, a, b) to linear sRGB.
#[inline]
fn oklab_to_linear_srgb(l_ok: f32, a: f32, b: f32) -> (f32, f32, f32) {
    // Oklab → LMS (cube roots)
    let l_ = 0.215_803_76f32.mul_add(b, 0.396_337_78f32.mul_add(a, l_ok));
    let m_ = 0.063_854_17f32.mul_add(-b, 0.105_561_346f32.mul_add(-a, l_ok));
    let s_ = 1.291_485_5f32.mul_add(-b, 0.089_484_18f32.mul_add(-a, l_ok));

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    // LMS → Linear sRGB
    let r = 0.230_969_94f32.mul_add(s, 4.076_741_7f32.mul_add(l, -(3.307_711_6 * m)));
    let g = 0.341_319_38f32.mul_add(-s, (-1.268_438f32).mul_add(l, 2.609_757_4 * m));
    let bl = 1.707_614_7f32.mul_add(s, (-0.004_196_086_3f32).mul_add(l, -(0.703_418_6 * m)));

    (r, g, bl)
}

/// Convert linear sRGB to Oklab (L, a, b).
#[inline]
fn linear_srgb_to_oklab(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    // Linear sRGB → LMS
    let l = 0.051_445_995f32.mul_add(b, 0.412_221_47f32.mul_add(r, 0.536_332_55 * g));
    let m = 0.107_396_96f32.mul_add(b, 0.211_903_5f32.mul_add(r, 0.680_699_5 * g));
    let s = 0.629_978_7f32.mul_add(b, 0.088_302_46f32.mul_add(r, 0.281_718_84 * g));

    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    let l_ok = 0.004_072_047f32.mul_add(-s_, 0.210_454_26f32.mul_add(l_, 0.793_617_8 * m_));
    let a = 0.450_593_7f32.mul_add(s_, 1.977_998_5f32.mul_add(l_, -(2.428_592_2 * m_)));
    let b_ok = 0.808_675_77f32.mul_add(-s_, 0.025_904_037f32.mul_add(l_, 0.782_771_77 * m_));

    (l_ok, a, b_ok)
}

/// Convert a single linear sRGB component to sRGB (apply gamma).
#[inline]
#[must_use]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055f32.mul_add(c.powf(1.0 / 2.4), -0.055)
    }
}

/// Convert a single sRGB component to linear sRGB (remove gamma).
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert sRGB (0.0–1.0) → OKLCH.
fn srgb_to_oklch(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let (l, a, b_ok) = linear_srgb_to_oklab(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));
    let (c, h) = oklab_ab_to_oklch(a, b_ok);
    (l, c, h)
}

/// Convert OKLCH → sRGB (0.0–1.0, may be out of gamut).
fn oklch_to_srgb(l: f32, c: f32, h: f32) -> (f32, f32, f32) {
    let (a, b) = oklch_to_oklab_ab(c, h);
    let (lr, lg, lb) = oklab_to_linear_srgb(l, a, b);
    (linear_to_srgb(lr), linear_to_srgb(lg), linear_to_srgb(lb))
}

/// Convert a float (0.0–1.0) to a u8 (0–255) with correct rounding.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f32) -> u8 {
    // Clamp guarantees 0.0 <= value <= 255.0 before truncation.
    v.mul_add(255.0, 0.5).clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
