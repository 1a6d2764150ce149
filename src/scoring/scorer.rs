use serde::Serialize;
use std::collections::BTreeMap;

use crate::features::types::WalletFeatures;

use super::normalize::FeatureExtrema;
use super::weights::WEIGHTS;

pub const MAX_SCORE: u16 = 1000;

/// A wallet and its credit score in `[0, 1000]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredWallet {
    pub wallet: String,
    pub score: u16,
}

/// Weighted sum of normalized features for one wallet, in `[0, 1]`.
///
/// A feature with no spread in the population contributes nothing, inverted
/// or not. A population of a single wallet therefore always scores 0.
pub fn raw_score(features: &WalletFeatures, extrema: &FeatureExtrema) -> f64 {
    let mut raw = 0.0;

    for entry in &WEIGHTS {
        let Some(range) = extrema.range(entry.feature) else {
            continue;
        };
        if range.is_degenerate() {
            continue;
        }

        let normalized = range.normalize(entry.feature.value(features));
        let oriented = if entry.inverted {
            1.0 - normalized
        } else {
            normalized
        };
        raw += entry.weight * oriented;
    }

    if raw.is_finite() {
        raw
    } else {
        0.0
    }
}

/// Clip to `[0, 1]` and scale to an integer score.
pub fn scale_score(raw: f64) -> u16 {
    if !raw.is_finite() {
        return 0;
    }
    (raw.clamp(0.0, 1.0) * f64::from(MAX_SCORE)).round() as u16
}

pub fn score_wallet(features: &WalletFeatures, extrema: &FeatureExtrema) -> ScoredWallet {
    ScoredWallet {
        wallet: features.wallet.clone(),
        score: scale_score(raw_score(features, extrema)),
    }
}

/// Score every wallet and rank them: highest score first, ties by wallet ascending.
pub fn rank_wallets(
    table: &BTreeMap<String, WalletFeatures>,
    extrema: &FeatureExtrema,
) -> Vec<ScoredWallet> {
    let mut scored: Vec<ScoredWallet> = table
        .values()
        .map(|features| score_wallet(features, extrema))
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.wallet.cmp(&b.wallet)));
    scored
}
