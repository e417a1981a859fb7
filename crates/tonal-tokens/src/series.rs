//! Weight series — the ordered labels of a tonal scale.

use std::collections::HashSet;

use serde::Serialize;

/// Ordered weight labels, one per scale position.
///
/// Position is significant: index 0 is the lightest end of every group's
/// scale, the last index the darkest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeightSeries(Vec<String>);

impl WeightSeries {
    #[must_use]
    pub const fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label at `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Position of `label` in the series.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// First label that appears more than once, if any.
    #[must_use]
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::with_capacity(self.0.len());
        self.iter().find(|l| !seen.insert(*l))
    }
}

/// Produces the weight labels for a scale of a given size.
pub trait WeightSeriesProvider {
    /// Return exactly `count` ordered, distinct labels.
    fn series(&self, count: usize) -> WeightSeries;
}

/// Labels positions `1..=count`, zero-padded to the width of `count`:
/// a 23-step scale runs `01` … `23`, a 9-step scale `1` … `9`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberedSeries;

impl WeightSeriesProvider for NumberedSeries {
    fn series(&self, count: usize) -> WeightSeries {
        let width = count.to_string().len();
        WeightSeries((1..=count).map(|n| format!("{n:0width$}")).collect())
    }
}
