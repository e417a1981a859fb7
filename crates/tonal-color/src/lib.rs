// SPDX-License-Identifier: MIT
//
// tonal-color — color primitives for the tonal token generator.
//
// Three things live here: the canonical `HexColor` that every input color is
// normalized into, an OKLCH `Color` for perceptual math, and `tonal_ramp`,
// which spreads one seed color across N evenly spaced lightness steps.
// Nothing in this crate knows about roles, themes or contrast rules.

// Small integer-to-float casts (step indices) are intentional.
#![allow(clippy::cast_precision_loss)]

pub mod color;
pub mod hex;
pub mod ramp;

pub use color::Color;
pub use hex::{HexColor, InvalidHex, normalize_hex};
pub use ramp::tonal_ramp;
