use std::collections::BTreeMap;

use crate::features::extractor;
use crate::features::types::WalletFeatures;
use crate::ingest::types::TransactionRecord;
use crate::scoring::normalize::FeatureExtrema;
use crate::scoring::scorer::{self, ScoredWallet};

/// Snapshot produced by one scoring run. Nothing in it is mutated after
/// `ScoringPipeline::run` returns.
#[derive(Debug, Clone, Default)]
pub struct ScoringRun {
    /// Feature table keyed by wallet, for diagnostic consumers.
    pub features: BTreeMap<String, WalletFeatures>,
    pub extrema: FeatureExtrema,
    /// Scores ranked highest first, ties by wallet ascending.
    pub scores: Vec<ScoredWallet>,
    pub records_processed: u64,
}

impl ScoringRun {
    pub fn wallets_scored(&self) -> usize {
        self.scores.len()
    }

    pub fn liquidated_wallets(&self) -> usize {
        self.features.values().filter(|f| f.is_liquidated()).count()
    }
}

/// Runs the batch in its fixed order:
/// 1. Feature extraction (per wallet, independent)
/// 2. Population extrema (needs every wallet's features)
/// 3. Per-wallet scoring and ranking
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoringPipeline;

impl ScoringPipeline {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, records: &[TransactionRecord]) -> ScoringRun {
        if records.is_empty() {
            tracing::info!("No transactions to score");
            return ScoringRun::default();
        }

        // Step 1: Feature extraction
        let features = extractor::extract_features(records);

        // Step 2: Population extrema
        let extrema = FeatureExtrema::collect(features.values());
        let degenerate = extrema.degenerate_features();
        if !degenerate.is_empty() {
            tracing::debug!(
                features = ?degenerate.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
                "Features without spread contribute nothing to scores"
            );
        }

        // Step 3: Scoring
        let scores = scorer::rank_wallets(&features, &extrema);

        let run = ScoringRun {
            features,
            extrema,
            scores,
            records_processed: records.len() as u64,
        };

        tracing::info!(
            records = run.records_processed,
            wallets = run.wallets_scored(),
            liquidated = run.liquidated_wallets(),
            "Scoring run complete"
        );
        run
    }
}
