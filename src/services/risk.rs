use crate::models::RiskStatus;

const HIGH_RISK_MAX_TVL: f64 = 50_000.0;
const MODERATE_RISK_MAX_TVL: f64 = 200_000.0;
const VOLATILITY_LIMIT_PCT: f64 = 10.0;

/// Labels a pool from its TVL and 24h price change.
///
/// A swing beyond ±10% marks the pool high risk regardless of liquidity.
pub fn assess_risk(tvl: f64, price_change_pct: f64) -> RiskStatus {
    if tvl < HIGH_RISK_MAX_TVL || price_change_pct.abs() > VOLATILITY_LIMIT_PCT {
        RiskStatus::new("High Risk", "red", "High volatility, low liquidity.")
    } else if tvl < MODERATE_RISK_MAX_TVL {
        RiskStatus::new("Moderate Risk", "orange", "Moderate volatility.")
    } else {
        RiskStatus::new("Safe", "green", "Stable liquidity pool.")
    }
}
