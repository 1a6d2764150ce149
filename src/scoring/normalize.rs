use std::collections::BTreeMap;

use crate::features::types::WalletFeatures;

use super::weights::{ScoringFeature, WEIGHTS};

/// Population minimum and maximum of one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    /// Min-max scale `value` into [0, 1]. A zero-width range maps everything to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 || !span.is_finite() {
            return 0.0;
        }
        let scaled = (value - self.min) / span;
        if scaled.is_finite() {
            scaled.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }
}

/// Per-feature extrema over a whole wallet population.
///
/// This is the barrier between feature extraction and scoring: it can only be
/// built once every wallet's features exist, and scoring any wallet needs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureExtrema {
    ranges: BTreeMap<ScoringFeature, FeatureRange>,
}

impl FeatureExtrema {
    /// Collect min/max of every weighted feature across `population`.
    pub fn collect<'a, I>(population: I) -> Self
    where
        I: IntoIterator<Item = &'a WalletFeatures>,
    {
        let mut ranges: BTreeMap<ScoringFeature, FeatureRange> = BTreeMap::new();

        for features in population {
            for entry in &WEIGHTS {
                let value = entry.feature.value(features);
                ranges
                    .entry(entry.feature)
                    .and_modify(|r| {
                        r.min = r.min.min(value);
                        r.max = r.max.max(value);
                    })
                    .or_insert(FeatureRange {
                        min: value,
                        max: value,
                    });
            }
        }

        Self { ranges }
    }

    pub fn range(&self, feature: ScoringFeature) -> Option<FeatureRange> {
        self.ranges.get(&feature).copied()
    }

    /// Features whose value is identical across the population.
    pub fn degenerate_features(&self) -> Vec<ScoringFeature> {
        self.ranges
            .iter()
            .filter(|(_, r)| r.is_degenerate())
            .map(|(f, _)| *f)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
