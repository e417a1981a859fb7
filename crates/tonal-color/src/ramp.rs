// SPDX-License-Identifier: MIT
//
// Tonal ramps — one seed color spread across N perceptual steps.
//
// The ramp runs darkest-first. The seed lands on the step whose position
// matches its own OKLCH lightness and is emitted verbatim, so a token
// scale always contains the exact color the designer picked. Steps below
// the seed blend toward a deep shade of the seed hue, steps above it blend
// toward a pale tint, both in OKLCH so the lightness staircase is even.

use crate::color::Color;
use crate::hex::HexColor;

/// Lightness of the darkest step.
const L_DARK: f32 = 0.14;

/// Lightness of the lightest step.
const L_LIGHT: f32 = 0.98;

/// Chroma kept at the dark end, relative to the seed.
const DARK_CHROMA: f32 = 0.35;

/// Chroma kept at the light end, relative to the seed.
const LIGHT_CHROMA: f32 = 0.10;

/// Build a darkest-first ramp of `count` colors anchored on `seed`.
///
/// Returns an empty vector for `count == 0` and `[seed]` for `count == 1`.
#[must_use]
pub fn tonal_ramp(seed: HexColor, count: usize) -> Vec<HexColor> {
    match count {
        0 => return Vec::new(),
        1 => return vec![seed],
        _ => {}
    }

    let anchor = Color::from(seed);
    let last = count - 1;
    let pivot = seed_position(anchor.l, last);

    let dark = Color::oklch(L_DARK.min(anchor.l), anchor.c * DARK_CHROMA, anchor.h);
    let light = Color::oklch(L_LIGHT.max(anchor.l), anchor.c * LIGHT_CHROMA, anchor.h);

    (0..count)
        .map(|step| {
            if step == pivot {
                seed
            } else if step < pivot {
                dark.mix(&anchor, ratio(step, pivot)).to_gamut().to_hex()
            } else {
                anchor.mix(&light, ratio(step - pivot, last - pivot)).to_gamut().to_hex()
            }
        })
        .collect()
}

/// Index in `0..=last` whose share of the lightness range matches `l`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn seed_position(l: f32, last: usize) -> usize {
    let t = ((l - L_DARK) / (L_LIGHT - L_DARK)).clamp(0.0, 1.0);
    let pos = (t * last as f32).round() as usize;
    pos.min(last)
}

#[inline]
fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 { 1.0 } else { num as f32 / den as f32 }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    #[test]
    fn empty_and_single() {
        assert!(tonal_ramp(seed("#5d10d1"), 0).is_empty());
        assert_eq!(tonal_ramp(seed("#5d10d1"), 1), vec![seed("#5d10d1")]);
    }

    #[test]
    fn ramp_has_requested_length() {
        for count in [2, 5, 9, 23, 40] {
            assert_eq!(tonal_ramp(seed("#206BB0"), count).len(), count);
        }
    }

    #[test]
    fn ramp_contains_seed_verbatim() {
        for s in ["#5D10D1", "#F2AA30", "#1C2230", "#47B872"] {
            let ramp = tonal_ramp(seed(s), 23);
            assert!(ramp.contains(&seed(s)), "{s} missing from its own ramp");
        }
    }

    #[test]
    fn ramp_runs_dark_to_light() {
        let ramp = tonal_ramp(seed("#904AAA"), 15);
        let lightness: Vec<f32> = ramp.iter().map(|h| Color::from(*h).l).collect();
        for pair in lightness.windows(2) {
            // 8-bit quantization can wobble by a hair; the trend must hold.
            assert!(pair[1] + 0.01 >= pair[0], "lightness went backwards: {lightness:?}");
        }
        assert!(lightness[0] < 0.2);
        assert!(lightness[14] > 0.9);
    }

    #[test]
    fn gray_seed_stays_gray() {
        let ramp = tonal_ramp(seed("#808080"), 9);
        for hex in ramp {
            assert!(Color::from(hex).c < 0.01, "{hex} picked up chroma");
        }
    }

    #[test]
    fn extreme_seeds_anchor_at_ends() {
        let black = tonal_ramp(HexColor::BLACK, 7);
        assert_eq!(black[0], HexColor::BLACK);
        let white = tonal_ramp(HexColor::WHITE, 7);
        assert_eq!(white[6], HexColor::WHITE);
    }
}
