//! Seed interpolation — spreading one seed color across a weight series.

use tonal_color::{HexColor, tonal_ramp};

use crate::series::WeightSeries;

/// Turns a seed color into one color per weight.
///
/// Output runs darkest-first and should have one entry per weight. The raw
/// palette builder tolerates shorter output and unreadable entries by
/// falling back to the seed, so implementations may be sloppy without
/// breaking a derivation.
pub trait SeedInterpolator {
    fn interpolate(&self, seed: HexColor, series: &WeightSeries) -> Vec<String>;
}

/// Perceptual OKLCH ramp anchored on the seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct OklchInterpolator;

impl SeedInterpolator for OklchInterpolator {
    fn interpolate(&self, seed: HexColor, series: &WeightSeries) -> Vec<String> {
        tonal_ramp(seed, series.len()).iter().map(ToString::to_string).collect()
    }
}
