use bigdecimal::{BigDecimal, ToPrimitive};
use serde_json::{Map, Value as JsonValue};
use std::str::FromStr;

use super::types::{Action, TransactionRecord};

const WALLET_KEYS: &[&str] = &["userWallet", "wallet", "user_wallet"];
const ACTION_DATA_KEYS: &[&str] = &["actionData", "action_data"];
const PRICE_KEYS: &[&str] = &["assetPriceUSD", "asset_price_usd"];

/// Outcome counters for one ledger load.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub accepted: u64,
    pub dropped: u64,
}

/// Load a transaction ledger from a JSON file.
pub fn load_ledger(path: &str) -> eyre::Result<(Vec<TransactionRecord>, LoadStats)> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("Failed to read transaction ledger '{}': {}", path, e))?;
    let loaded = parse_ledger(&content)
        .map_err(|e| eyre::eyre!("Failed to parse transaction ledger '{}': {}", path, e))?;

    tracing::info!(
        accepted = loaded.1.accepted,
        dropped = loaded.1.dropped,
        "Loaded transaction ledger from {}",
        path
    );
    Ok(loaded)
}

/// Parse a ledger document.
///
/// Only a document that is not a JSON array fails. Individual entries that
/// lack a wallet or a usable timestamp are dropped and counted; missing
/// amount/price data degrades to a zero USD value.
pub fn parse_ledger(content: &str) -> eyre::Result<(Vec<TransactionRecord>, LoadStats)> {
    let document: JsonValue =
        serde_json::from_str(content).map_err(|e| eyre::eyre!("invalid JSON: {}", e))?;

    let entries = match document {
        JsonValue::Array(entries) => entries,
        other => {
            return Err(eyre::eyre!(
                "expected a JSON array of transactions, found {}",
                json_kind(&other)
            ))
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut stats = LoadStats::default();

    for (index, entry) in entries.into_iter().enumerate() {
        match record_from_entry(entry) {
            Some(record) => {
                records.push(record);
                stats.accepted += 1;
            }
            None => {
                tracing::debug!(index, "Dropping ledger entry without wallet or timestamp");
                stats.dropped += 1;
            }
        }
    }

    if stats.dropped > 0 {
        tracing::warn!(
            dropped = stats.dropped,
            "Some ledger entries were unusable and have been skipped"
        );
    }

    Ok((records, stats))
}

/// Build a record from one ledger entry. Only the identity fields (wallet and
/// timestamp) can reject an entry; every other field that is missing or has
/// the wrong type is read as absent.
fn record_from_entry(entry: JsonValue) -> Option<TransactionRecord> {
    let JsonValue::Object(fields) = entry else {
        return None;
    };

    let wallet = lookup(&fields, WALLET_KEYS)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|w| !w.is_empty())?
        .to_string();
    let timestamp = fields.get("timestamp").and_then(parse_timestamp)?;

    let action = fields
        .get("action")
        .and_then(JsonValue::as_str)
        .and_then(Action::parse);
    let protocol = fields
        .get("protocol")
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    let action_data = lookup(&fields, ACTION_DATA_KEYS).and_then(JsonValue::as_object);
    let amount = action_data
        .and_then(|data| data.get("amount"))
        .and_then(parse_decimal);
    let price = action_data
        .and_then(|data| lookup(data, PRICE_KEYS))
        .and_then(parse_decimal);

    Some(TransactionRecord::new(timestamp, wallet, action, protocol, amount, price))
}

/// First non-null value stored under any of `keys`.
fn lookup<'a>(fields: &'a Map<String, JsonValue>, keys: &[&str]) -> Option<&'a JsonValue> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

fn parse_timestamp(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Amounts arrive as raw integer strings that can exceed `u64`, so they go
/// through `BigDecimal` before narrowing to `f64`.
fn parse_decimal(value: &JsonValue) -> Option<f64> {
    let decimal = match value {
        JsonValue::Number(n) => BigDecimal::from_str(&n.to_string()).ok()?,
        JsonValue::String(s) => BigDecimal::from_str(s.trim()).ok()?,
        _ => return None,
    };
    decimal.to_f64().filter(|f| f.is_finite())
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEDGER: &str = r#"[
        {
            "_id": {"$oid": "681d38fed63812d4655f571a"},
            "userWallet": "0x00000000001accfa9cef68cf5371a23025b6d4b6",
            "network": "polygon",
            "protocol": "aave_v2",
            "txHash": "0x695c69acf608fbf5d38e48ca5535e118cc213a89e3d6d2e66e6b0e3b2e8d4190",
            "timestamp": 1629178166,
            "action": "deposit",
            "actionData": {
                "type": "Deposit",
                "amount": "2000000000",
                "assetSymbol": "USDC",
                "assetPriceUSD": "0.9938318274296357543568636362026045"
            }
        },
        {
            "userWallet": "0xabc",
            "timestamp": "1621525013",
            "action": "Borrow",
            "actionData": {"amount": 5.5, "assetPriceUSD": 2.0}
        },
        {
            "userWallet": "0xabc",
            "timestamp": 1621525100,
            "action": "repay"
        },
        {"timestamp": 1621525013, "action": "deposit"},
        {"userWallet": "0xdef", "action": "deposit"},
        {"userWallet": "   ", "timestamp": 1, "action": "deposit"},
        "not-an-object",
        42
    ]"#;

    #[test]
    fn test_parse_ledger_accepts_and_drops() {
        let (records, stats) = parse_ledger(LEDGER).unwrap();
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.dropped, 5);
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.wallet, "0x00000000001accfa9cef68cf5371a23025b6d4b6");
        assert_eq!(first.timestamp, 1629178166);
        assert_eq!(first.action, Some(Action::Deposit));
        assert_eq!(first.protocol.as_deref(), Some("aave_v2"));
        assert!((first.usd_value - 2_000_000_000.0 * 0.9938318274296357).abs() < 1.0);
    }

    #[test]
    fn test_numeric_and_string_fields() {
        let (records, _) = parse_ledger(LEDGER).unwrap();
        let borrow = &records[1];
        assert_eq!(borrow.timestamp, 1621525013);
        assert_eq!(borrow.action, Some(Action::Borrow));
        assert_eq!(borrow.usd_value, 11.0);
        assert_eq!(borrow.protocol, None);
    }

    #[test]
    fn test_missing_action_data_counts_with_zero_value() {
        let (records, _) = parse_ledger(LEDGER).unwrap();
        let repay = &records[2];
        assert_eq!(repay.action, Some(Action::Repay));
        assert_eq!(repay.amount, None);
        assert_eq!(repay.usd_value, 0.0);
    }

    #[test]
    fn test_non_numeric_amount_degrades() {
        let ledger = r#"[{"userWallet": "w", "timestamp": 10, "action": "deposit",
            "actionData": {"amount": "lots", "assetPriceUSD": "1.0"}}]"#;
        let (records, stats) = parse_ledger(ledger).unwrap();
        assert_eq!(stats.accepted, 1);
        assert_eq!(records[0].amount, None);
        assert_eq!(records[0].asset_price_usd, Some(1.0));
        assert_eq!(records[0].usd_value, 0.0);
    }

    #[test]
    fn test_wrong_typed_fields_keep_record() {
        let ledger = r#"[
            {"userWallet": "w", "timestamp": 10, "action": "deposit", "actionData": "garbage"},
            {"userWallet": "w", "timestamp": 11, "action": "deposit", "protocol": 7},
            {"userWallet": "w", "timestamp": 12, "action": 5},
            {"userWallet": "w", "timestamp": 13, "action": "repay",
             "actionData": {"amount": [1], "assetPriceUSD": {"usd": 1}}}
        ]"#;
        let (records, stats) = parse_ledger(ledger).unwrap();
        assert_eq!(stats.accepted, 4);
        assert_eq!(stats.dropped, 0);

        assert_eq!(records[0].action, Some(Action::Deposit));
        assert_eq!(records[0].usd_value, 0.0);
        assert_eq!(records[1].protocol, None);
        assert_eq!(records[1].action, Some(Action::Deposit));
        assert_eq!(records[2].action, None);
        assert_eq!(records[3].amount, None);
        assert_eq!(records[3].asset_price_usd, None);
        assert_eq!(records[3].usd_value, 0.0);
    }

    #[test]
    fn test_wrong_typed_identity_drops_record() {
        let ledger = r#"[
            {"userWallet": 12345, "timestamp": 10, "action": "deposit"},
            {"userWallet": "w", "timestamp": {"$date": 10}, "action": "deposit"},
            {"userWallet": "w", "timestamp": "yesterday", "action": "deposit"}
        ]"#;
        let (records, stats) = parse_ledger(ledger).unwrap();
        assert!(records.is_empty());
        assert_eq!(stats.dropped, 3);
    }

    #[test]
    fn test_missing_or_blank_action_is_untagged() {
        let ledger = r#"[
            {"userWallet": "w", "timestamp": 10, "action": "deposit"},
            {"userWallet": "w", "timestamp": 20},
            {"userWallet": "w", "timestamp": 30, "action": " "}
        ]"#;
        let (records, stats) = parse_ledger(ledger).unwrap();
        assert_eq!(stats.accepted, 3);
        assert_eq!(records[1].action, None);
        assert_eq!(records[2].action, None);

        let features = crate::features::extractor::extract_features(&records);
        assert_eq!(features["w"].unique_actions, 1);
        assert_eq!(features["w"].txn_count, 3);
    }

    #[test]
    fn test_field_aliases() {
        let ledger = r#"[{"wallet": "w", "timestamp": 10, "action": "borrow",
            "action_data": {"amount": "3", "asset_price_usd": "2"}}]"#;
        let (records, _) = parse_ledger(ledger).unwrap();
        assert_eq!(records[0].wallet, "w");
        assert_eq!(records[0].usd_value, 6.0);
    }

    #[test]
    fn test_structural_error_on_non_array() {
        assert!(parse_ledger(r#"{"userWallet": "w"}"#).is_err());
        assert!(parse_ledger("not json").is_err());
    }

    #[test]
    fn test_empty_ledger() {
        let (records, stats) = parse_ledger("[]").unwrap();
        assert!(records.is_empty());
        assert_eq!(stats, LoadStats::default());
    }

    #[test]
    fn test_load_ledger_missing_file() {
        assert!(load_ledger("/nonexistent/ledger.json").is_err());
    }
}
