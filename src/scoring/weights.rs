use crate::features::types::WalletFeatures;

/// Features that take part in the credit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScoringFeature {
    TxnFrequencyPerActiveDay,
    UniqueActions,
    TotalUsdVolume,
    WalletAgeDays,
    AvgDailyUsdVolume,
    NetUsdFlow,
    RepayToBorrowRatio,
    ActiveDays,
    TxnCount,
    StdTxnInterval,
    HasBeenLiquidated,
}

impl ScoringFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TxnFrequencyPerActiveDay => "txn_frequency_per_active_day",
            Self::UniqueActions => "unique_actions",
            Self::TotalUsdVolume => "total_usd_volume",
            Self::WalletAgeDays => "wallet_age_days",
            Self::AvgDailyUsdVolume => "avg_daily_usd_volume",
            Self::NetUsdFlow => "net_usd_flow",
            Self::RepayToBorrowRatio => "repay_to_borrow_ratio",
            Self::ActiveDays => "active_days",
            Self::TxnCount => "txn_count",
            Self::StdTxnInterval => "std_txn_interval",
            Self::HasBeenLiquidated => "has_been_liquidated",
        }
    }

    /// Raw (unnormalized) value of this feature for one wallet.
    pub fn value(&self, features: &WalletFeatures) -> f64 {
        match self {
            Self::TxnFrequencyPerActiveDay => features.txn_frequency_per_active_day,
            Self::UniqueActions => features.unique_actions as f64,
            Self::TotalUsdVolume => features.total_usd_volume,
            Self::WalletAgeDays => features.wallet_age_days as f64,
            Self::AvgDailyUsdVolume => features.avg_daily_usd_volume,
            Self::NetUsdFlow => features.net_usd_flow,
            Self::RepayToBorrowRatio => features.repay_to_borrow_ratio,
            Self::ActiveDays => features.active_days as f64,
            Self::TxnCount => features.txn_count as f64,
            Self::StdTxnInterval => features.std_txn_interval,
            Self::HasBeenLiquidated => f64::from(features.has_been_liquidated),
        }
    }
}

/// One row of the weight table.
#[derive(Debug, Clone, Copy)]
pub struct FeatureWeight {
    pub feature: ScoringFeature,
    pub weight: f64,
    /// Lower is better: the normalized value is flipped (`1 - v`) before weighting.
    pub inverted: bool,
}

const fn weight(feature: ScoringFeature, weight: f64, inverted: bool) -> FeatureWeight {
    FeatureWeight {
        feature,
        weight,
        inverted,
    }
}

/// The fixed scoring formula. Weights sum to 1.0.
///
/// Changing any entry changes the meaning of every previously computed score.
pub const WEIGHTS: [FeatureWeight; 11] = [
    weight(ScoringFeature::TxnFrequencyPerActiveDay, 0.20, false),
    weight(ScoringFeature::UniqueActions, 0.15, false),
    weight(ScoringFeature::TotalUsdVolume, 0.15, false),
    weight(ScoringFeature::WalletAgeDays, 0.10, false),
    weight(ScoringFeature::AvgDailyUsdVolume, 0.10, false),
    weight(ScoringFeature::NetUsdFlow, 0.10, false),
    weight(ScoringFeature::RepayToBorrowRatio, 0.10, false),
    weight(ScoringFeature::ActiveDays, 0.05, false),
    weight(ScoringFeature::TxnCount, 0.05, false),
    weight(ScoringFeature::StdTxnInterval, 0.05, true),
    weight(ScoringFeature::HasBeenLiquidated, 0.05, true),
];

pub fn total_weight() -> f64 {
    WEIGHTS.iter().map(|w| w.weight).sum()
}
