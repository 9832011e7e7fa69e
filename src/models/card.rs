use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RiskStatus {
    pub label: String,
    pub color: String,
    pub description: String,
}

impl RiskStatus {
    pub fn new(label: &str, color: &str, description: &str) -> Self {
        Self {
            label: label.to_string(),
            color: color.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metrics {
    pub apy: Metric,
    pub tvl: Metric,
    pub volume: Metric,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RawTokenIds {
    pub base_token_id: Option<String>,
    pub quote_token_id: Option<String>,
}

/// Display-ready projection of a pool row for the front-end pool list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PoolCard {
    pub id: Option<String>,
    pub title: String,
    pub sub_title: String,
    pub tags: Vec<String>,
    pub badge: RiskStatus,
    pub metrics: Metrics,
    pub description: String,
    pub contract_address: String,
    pub raw_data: RawTokenIds,
}
