/// Canonical action tags recognized by the feature extractor.
///
/// Raw tags are normalized by lowercasing and stripping `-`, `_` and
/// whitespace before matching, so `LiquidationCall`, `liquidation-call` and
/// `liquidation_call` all land on the same variant. Unknown tags are kept
/// verbatim (normalized) in `Other` and are never folded into a canonical one.
/// A blank tag is no tag at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Deposit,
    Borrow,
    Repay,
    Redeem,
    LiquidationCall,
    Other(String),
}

impl Action {
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .chars()
            .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        let action = match normalized.as_str() {
            "" => return None,
            "deposit" => Self::Deposit,
            "borrow" => Self::Borrow,
            "repay" => Self::Repay,
            "redeem" | "redeemunderlying" => Self::Redeem,
            "liquidationcall" => Self::LiquidationCall,
            _ => Self::Other(normalized),
        };
        Some(action)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Deposit => "deposit",
            Self::Borrow => "borrow",
            Self::Repay => "repay",
            Self::Redeem => "redeem",
            Self::LiquidationCall => "liquidationcall",
            Self::Other(tag) => tag.as_str(),
        }
    }

    /// Actions that move value into the protocol on the wallet's behalf.
    pub fn is_inflow(&self) -> bool {
        matches!(self, Self::Deposit | Self::Repay)
    }

    /// Actions that move value out of the protocol to the wallet.
    pub fn is_outflow(&self) -> bool {
        matches!(self, Self::Borrow | Self::Redeem)
    }
}

/// A single lending-protocol transaction, ready for aggregation.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub wallet: String,
    /// `None` when the ledger entry carried no usable action tag.
    pub action: Option<Action>,
    pub protocol: Option<String>,
    /// Asset-denominated amount; `None` when missing or unparsable.
    pub amount: Option<f64>,
    /// Asset price in USD at transaction time; `None` when missing or unparsable.
    pub asset_price_usd: Option<f64>,
    pub usd_value: f64,
}

impl TransactionRecord {
    pub fn new(
        timestamp: i64,
        wallet: impl Into<String>,
        action: impl Into<Option<Action>>,
        protocol: Option<String>,
        amount: Option<f64>,
        asset_price_usd: Option<f64>,
    ) -> Self {
        let usd_value = usd_value(amount, asset_price_usd);
        Self {
            timestamp,
            wallet: wallet.into(),
            action: action.into(),
            protocol,
            amount,
            asset_price_usd,
            usd_value,
        }
    }
}

/// `amount * price`, or 0 when either side is missing, negative or non-finite.
fn usd_value(amount: Option<f64>, price: Option<f64>) -> f64 {
    match (amount, price) {
        (Some(a), Some(p)) if a.is_finite() && p.is_finite() && a >= 0.0 && p >= 0.0 => {
            let value = a * p;
            if value.is_finite() {
                value
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
