use serde::Serialize;

/// Behavioral metrics for one wallet, derived from its full transaction history.
///
/// Every numeric field is finite. Values that the arithmetic leaves undefined
/// (standard deviation of one sample, ratios over zero) are stored as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletFeatures {
    pub wallet: String,
    pub txn_count: u64,
    pub active_days: u64,
    pub txn_frequency_per_active_day: f64,
    pub wallet_age_days: u64,
    pub total_usd_volume: f64,
    pub avg_txn_value: f64,
    pub avg_daily_usd_volume: f64,
    pub std_txn_interval: f64,
    pub min_txn_interval: f64,
    pub max_txn_interval: f64,
    pub unique_protocols: u64,
    pub unique_actions: u64,
    pub net_usd_flow: f64,
    pub deposit_count: u64,
    pub borrow_count: u64,
    pub repay_count: u64,
    pub repay_to_borrow_ratio: f64,
    /// 1 when any liquidation call hit this wallet, else 0.
    pub has_been_liquidated: u8,
}

impl WalletFeatures {
    pub fn is_liquidated(&self) -> bool {
        self.has_been_liquidated != 0
    }
}
