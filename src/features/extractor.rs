use chrono::{DateTime, NaiveDate};
use std::collections::{BTreeMap, HashSet};

use crate::ingest::types::{Action, TransactionRecord};

use super::stats::{self, finite_or_zero, safe_ratio};
use super::types::WalletFeatures;

const SECONDS_PER_DAY: i64 = 86_400;

/// Group transactions by wallet and compute one feature row per wallet.
///
/// Input order does not matter. Wallets with no records produce no row, and
/// an empty input yields an empty table. The table is keyed by wallet so that
/// iteration order is stable across runs.
pub fn extract_features(records: &[TransactionRecord]) -> BTreeMap<String, WalletFeatures> {
    let mut by_wallet: BTreeMap<&str, Vec<&TransactionRecord>> = BTreeMap::new();
    for record in records {
        by_wallet.entry(record.wallet.as_str()).or_default().push(record);
    }

    let table: BTreeMap<String, WalletFeatures> = by_wallet
        .into_iter()
        .map(|(wallet, mut group)| {
            group.sort_by_key(|r| r.timestamp);
            (wallet.to_string(), wallet_features(wallet, &group))
        })
        .collect();

    tracing::debug!(
        records = records.len(),
        wallets = table.len(),
        "Extracted wallet features"
    );
    table
}

/// Compute features for one wallet. `group` must be sorted by timestamp.
fn wallet_features(wallet: &str, group: &[&TransactionRecord]) -> WalletFeatures {
    let txn_count = group.len() as u64;

    let timestamps: Vec<i64> = group.iter().map(|r| r.timestamp).collect();
    let active_days = group
        .iter()
        .filter_map(|r| calendar_date(r.timestamp))
        .collect::<HashSet<NaiveDate>>()
        .len() as u64;

    let wallet_age_days = match (timestamps.first(), timestamps.last()) {
        (Some(first), Some(last)) => (last.saturating_sub(*first) / SECONDS_PER_DAY) as u64,
        _ => 0,
    };

    let interval_stats = stats::interval_stats(&stats::intervals(&timestamps));

    let mut total_usd_volume = 0.0;
    let mut inflow_usd = 0.0;
    let mut outflow_usd = 0.0;
    let mut deposit_count = 0u64;
    let mut borrow_count = 0u64;
    let mut repay_count = 0u64;
    let mut redeem_count = 0u64;
    let mut liquidated = false;
    let mut protocols: HashSet<&str> = HashSet::new();
    let mut actions: HashSet<&Action> = HashSet::new();

    for record in group {
        total_usd_volume += record.usd_value;
        if let Some(protocol) = record.protocol.as_deref() {
            protocols.insert(protocol);
        }

        // Untagged records still count as activity above.
        let Some(action) = record.action.as_ref() else {
            continue;
        };

        if action.is_inflow() {
            inflow_usd += record.usd_value;
        } else if action.is_outflow() {
            outflow_usd += record.usd_value;
        }

        match action {
            Action::Deposit => deposit_count += 1,
            Action::Borrow => borrow_count += 1,
            Action::Repay => repay_count += 1,
            Action::Redeem => redeem_count += 1,
            Action::LiquidationCall => liquidated = true,
            Action::Other(_) => {}
        }
        actions.insert(action);
    }

    tracing::trace!(wallet, redeem_count, "Aggregated wallet transactions");

    let total_usd_volume = finite_or_zero(total_usd_volume);

    WalletFeatures {
        wallet: wallet.to_string(),
        txn_count,
        active_days,
        txn_frequency_per_active_day: safe_ratio(txn_count as f64, active_days as f64),
        wallet_age_days,
        total_usd_volume,
        avg_txn_value: safe_ratio(total_usd_volume, txn_count as f64),
        avg_daily_usd_volume: safe_ratio(total_usd_volume, active_days as f64),
        std_txn_interval: interval_stats.std,
        min_txn_interval: interval_stats.min,
        max_txn_interval: interval_stats.max,
        unique_protocols: protocols.len() as u64,
        unique_actions: actions.len() as u64,
        net_usd_flow: finite_or_zero(inflow_usd - outflow_usd),
        deposit_count,
        borrow_count,
        repay_count,
        repay_to_borrow_ratio: safe_ratio(repay_count as f64, borrow_count as f64),
        has_been_liquidated: u8::from(liquidated),
    }
}

fn calendar_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}
