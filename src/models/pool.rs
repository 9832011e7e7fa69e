use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One flattened row of a provider pool listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PoolRow {
    pub id: Option<String>,
    pub address: Option<String>,
    /// Pair label, e.g. "USDT / WETH 0.05%"
    pub name: Option<String>,
    pub pool_created_at: Option<String>,
    pub base_token_price_usd: Option<f64>,
    pub quote_token_price_usd: Option<f64>,
    pub fdv_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub reserve_in_usd: Option<f64>,
    pub price_change_percentage_h1: Option<f64>,
    pub price_change_percentage_h24: Option<f64>,
    pub volume_usd_h1: Option<f64>,
    pub volume_usd_h24: Option<f64>,
    pub transactions_h24_buys: Option<u64>,
    pub transactions_h24_sells: Option<u64>,
    pub base_token_id: Option<String>,
    pub quote_token_id: Option<String>,
    pub dex_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Network {
    pub id: String,
    pub name: Option<String>,
    pub coingecko_asset_platform_id: Option<String>,
}

/// Reads a provider amount that may be a JSON number, a numeric string or null.
/// Anything unparseable or non-finite is treated as absent.
pub fn parse_amount(value: Option<&Value>) -> Option<f64> {
    let amount = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    amount.is_finite().then_some(amount)
}
