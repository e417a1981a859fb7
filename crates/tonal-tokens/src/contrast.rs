//! WCAG contrast ratios and their letter grades.
//!
//! Every raw token is tagged with its contrast against both backgrounds
//! before derivation starts; the engine then only compares numbers. The
//! numbers follow WCAG 2.1:
//!
//! - `AAA`: ratio >= 7.0
//! - `AA`: ratio >= 4.5
//! - `AA Large`: ratio >= 3.0 (large or bold text only)
//! - `Fail`: anything lower

use std::fmt;

use serde::Serialize;
use tonal_color::HexColor;
use tonal_color::color::srgb_to_linear;

/// Compute the relative luminance of a color per WCAG 2.1.
///
/// Uses the standard sRGB linearization + weighted sum formula:
///   L = 0.2126 * `R_lin` + 0.7152 * `G_lin` + 0.0722 * `B_lin`
///
/// Returns a value in [0.0, 1.0] where 0 is black and 1 is white.
#[must_use]
pub fn relative_luminance(color: HexColor) -> f64 {
    let (r, g, b) = color.rgb8();
    let lin = |v: u8| f64::from(srgb_to_linear(f32::from(v) / 255.0));
    0.2126f64.mul_add(lin(r), 0.7152f64.mul_add(lin(g), 0.0722 * lin(b)))
}

/// Compute the WCAG 2.1 contrast ratio between two colors.
///
/// Returns a value in [1.0, 21.0]:
///   (`L_lighter` + 0.05) / (`L_darker` + 0.05)
///
/// The result is the same regardless of argument order.
#[must_use]
pub fn contrast_ratio(a: HexColor, b: HexColor) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Grade the contrast between two colors.
#[must_use]
pub fn contrast_rating(a: HexColor, b: HexColor) -> ContrastRating {
    ContrastRating::from_ratio(contrast_ratio(a, b))
}

/// WCAG conformance grade of a contrast ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ContrastRating {
    #[serde(rename = "Fail")]
    Fail,
    #[serde(rename = "AA Large")]
    AaLarge,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AAA")]
    Aaa,
}

impl ContrastRating {
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 7.0 {
            Self::Aaa
        } else if ratio >= 4.5 {
            Self::Aa
        } else if ratio >= 3.0 {
            Self::AaLarge
        } else {
            Self::Fail
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fail => "Fail",
            Self::AaLarge => "AA Large",
            Self::Aa => "AA",
            Self::Aaa => "AAA",
        }
    }
}

impl fmt::Display for ContrastRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ratio and its grade, as measured against one background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContrastReading {
    pub ratio: f64,
    pub rating: ContrastRating,
}

/// Measures contrast between a foreground and a background.
///
/// Implementations must be deterministic; the derivation caches on the
/// assumption that the same pair always yields the same reading.
pub trait ContrastEvaluator {
    fn ratio(&self, fg: HexColor, bg: HexColor) -> f64;

    fn rating(&self, fg: HexColor, bg: HexColor) -> ContrastRating;

    fn reading(&self, fg: HexColor, bg: HexColor) -> ContrastReading {
        ContrastReading {
            ratio: self.ratio(fg, bg),
            rating: self.rating(fg, bg),
        }
    }
}

/// WCAG 2.1 luminance contrast.
#[derive(Debug, Clone, Copy, Default)]
pub struct WcagContrast;

impl ContrastEvaluator for WcagContrast {
    fn ratio(&self, fg: HexColor, bg: HexColor) -> f64 {
        contrast_ratio(fg, bg)
    }

    fn rating(&self, fg: HexColor, bg: HexColor) -> ContrastRating {
        contrast_rating(fg, bg)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn hex(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    // ── Relative luminance ──────────────────────────────────────────

    #[test]
    fn luminance_black_is_zero() {
        let lum = relative_luminance(HexColor::BLACK);
        assert!(approx_eq(lum, 0.0, 0.001), "Black luminance: {lum}");
    }

    #[test]
    fn luminance_white_is_one() {
        let lum = relative_luminance(HexColor::WHITE);
        assert!(approx_eq(lum, 1.0, 0.001), "White luminance: {lum}");
    }

    #[test]
    fn luminance_pure_red() {
        let lum = relative_luminance(hex("#FF0000"));
        assert!(approx_eq(lum, 0.2126, 0.001), "Red luminance: {lum}");
    }

    #[test]
    fn luminance_pure_green() {
        let lum = relative_luminance(hex("#00FF00"));
        assert!(approx_eq(lum, 0.7152, 0.001), "Green luminance: {lum}");
    }

    // ── Contrast ratio ──────────────────────────────────────────────

    #[test]
    fn contrast_black_white_is_21() {
        let ratio = contrast_ratio(HexColor::BLACK, HexColor::WHITE);
        assert!(approx_eq(ratio, 21.0, 0.01), "B/W contrast: {ratio}");
    }

    #[test]
    fn contrast_same_color_is_1() {
        let c = hex("#5D10D1");
        assert!(approx_eq(contrast_ratio(c, c), 1.0, 1e-9));
    }

    #[test]
    fn contrast_is_symmetric() {
        let a = hex("#CC334D");
        let b = hex("#1A1A66");
        assert!(approx_eq(contrast_ratio(a, b), contrast_ratio(b, a), 1e-12));
    }

    #[test]
    fn known_pair_matches_reference() {
        // #777777 on white is the classic just-below-AA gray (4.48:1).
        let ratio = contrast_ratio(hex("#777777"), HexColor::WHITE);
        assert!(approx_eq(ratio, 4.48, 0.01), "gray on white: {ratio}");
    }

    // ── Ratings ─────────────────────────────────────────────────────

    #[test]
    fn rating_thresholds() {
        assert_eq!(ContrastRating::from_ratio(21.0), ContrastRating::Aaa);
        assert_eq!(ContrastRating::from_ratio(7.0), ContrastRating::Aaa);
        assert_eq!(ContrastRating::from_ratio(6.99), ContrastRating::Aa);
        assert_eq!(ContrastRating::from_ratio(4.5), ContrastRating::Aa);
        assert_eq!(ContrastRating::from_ratio(3.0), ContrastRating::AaLarge);
        assert_eq!(ContrastRating::from_ratio(2.99), ContrastRating::Fail);
        assert_eq!(ContrastRating::from_ratio(1.0), ContrastRating::Fail);
    }

    #[test]
    fn rating_of_gray_on_white_is_large_only() {
        assert_eq!(contrast_rating(hex("#777777"), HexColor::WHITE), ContrastRating::AaLarge);
    }

    #[test]
    fn rating_serializes_as_label() {
        assert_eq!(serde_json::to_string(&ContrastRating::AaLarge).unwrap(), "\"AA Large\"");
        assert_eq!(ContrastRating::Aaa.to_string(), "AAA");
    }

    #[test]
    fn evaluator_reading_combines_both() {
        let reading = WcagContrast.reading(HexColor::BLACK, HexColor::WHITE);
        assert_eq!(reading.rating, ContrastRating::Aaa);
        assert!(approx_eq(reading.ratio, 21.0, 0.01));
    }
}
