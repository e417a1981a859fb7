//! The pluggable collaborators of a derivation.

use std::fmt;

use crate::contrast::{ContrastEvaluator, WcagContrast};
use crate::interpolate::{OklchInterpolator, SeedInterpolator};
use crate::series::{NumberedSeries, WeightSeriesProvider};

/// Weight labels, seed interpolation and contrast measurement, bundled.
///
/// Hosts substitute any of the three with the `with_*` builders; the
/// default toolkit uses [`NumberedSeries`], [`OklchInterpolator`] and
/// [`WcagContrast`].
pub struct Toolkit {
    pub series: Box<dyn WeightSeriesProvider + Send + Sync>,
    pub interpolator: Box<dyn SeedInterpolator + Send + Sync>,
    pub contrast: Box<dyn ContrastEvaluator + Send + Sync>,
}

impl Toolkit {
    #[must_use]
    pub fn with_series(mut self, series: impl WeightSeriesProvider + Send + Sync + 'static) -> Self {
        self.series = Box::new(series);
        self
    }

    #[must_use]
    pub fn with_interpolator(mut self, interpolator: impl SeedInterpolator + Send + Sync + 'static) -> Self {
        self.interpolator = Box::new(interpolator);
        self
    }

    #[must_use]
    pub fn with_contrast(mut self, contrast: impl ContrastEvaluator + Send + Sync + 'static) -> Self {
        self.contrast = Box::new(contrast);
        self
    }
}

impl Default for Toolkit {
    fn default() -> Self {
        Self {
            series: Box::new(NumberedSeries),
            interpolator: Box::new(OklchInterpolator),
            contrast: Box::new(WcagContrast),
        }
    }
}

impl fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolkit").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::WeightSeries;

    struct Letters;

    impl WeightSeriesProvider for Letters {
        fn series(&self, count: usize) -> WeightSeries {
            WeightSeries::new((0..count).map(|i| char::from(b'a' + (i % 26) as u8).to_string()).collect())
        }
    }

    #[test]
    fn default_toolkit_numbers_weights() {
        let kit = Toolkit::default();
        assert_eq!(kit.series.series(3).label(2), Some("3"));
    }

    #[test]
    fn series_can_be_substituted() {
        let kit = Toolkit::default().with_series(Letters);
        assert_eq!(kit.series.series(3).label(2), Some("c"));
    }
}
