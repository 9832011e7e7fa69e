use crate::models::{Metric, Metrics, PoolCard, PoolRow, RawTokenIds};
use super::risk::assess_risk;

const UNKNOWN_POOL: &str = "Unknown Pool";
const PAIR_SEPARATOR: &str = " / ";
const FALLBACK_TOKENS: [&str; 2] = ["Token A", "Token B"];

/// How the card subtitle ("protocol • network") is produced.
#[derive(Debug, Clone)]
enum SubTitle {
    Fixed(String),
    /// `"{dex_id} • {network}"` per row
    PerNetwork(String),
}

/// Turns provider pool rows into UI pool cards.
#[derive(Debug, Clone)]
pub struct PoolCardFormatter {
    sub_title: SubTitle,
}

impl PoolCardFormatter {
    pub fn with_sub_title(label: impl Into<String>) -> Self {
        Self {
            sub_title: SubTitle::Fixed(label.into()),
        }
    }

    pub fn for_network(network_id: impl Into<String>) -> Self {
        Self {
            sub_title: SubTitle::PerNetwork(network_id.into()),
        }
    }

    pub fn format_cards(&self, rows: &[PoolRow]) -> Vec<PoolCard> {
        if rows.is_empty() {
            return Vec::new();
        }
        rows.iter().map(|row| self.format_card(row)).collect()
    }

    pub fn format_card(&self, row: &PoolRow) -> PoolCard {
        let tvl = row.reserve_in_usd.unwrap_or(0.0);
        let price_change_pct = row.price_change_percentage_h24.unwrap_or(0.0);
        let volume = row.volume_usd_h24.unwrap_or(0.0);
        let raw_name = row.name.as_deref().unwrap_or(UNKNOWN_POOL);

        let (title, tags) = match extract_tokens(raw_name) {
            Some([token0, token1]) => (
                format!("{}-{} Pool", token0, token1),
                vec![token0, token1],
            ),
            None => (
                raw_name.to_string(),
                FALLBACK_TOKENS.iter().map(|t| t.to_string()).collect(),
            ),
        };

        let badge = assess_risk(tvl, price_change_pct);
        let description = badge.description.clone();

        // Price change stands in for APY until the provider exposes yield
        let apy_color = if price_change_pct >= 0.0 { "green" } else { "red" };

        PoolCard {
            id: row.id.clone(),
            title,
            sub_title: self.sub_title_for(row),
            tags,
            badge,
            metrics: Metrics {
                apy: Metric {
                    label: "APY".to_string(),
                    value: format!("%{:.1}", price_change_pct.abs()),
                    color: Some(apy_color.to_string()),
                },
                tvl: Metric {
                    label: "TVL".to_string(),
                    value: format_currency(tvl),
                    color: None,
                },
                volume: Metric {
                    label: "24h Volume".to_string(),
                    value: format_currency(volume),
                    color: None,
                },
            },
            description,
            contract_address: row.address.clone().unwrap_or_default(),
            raw_data: RawTokenIds {
                base_token_id: row.base_token_id.clone(),
                quote_token_id: row.quote_token_id.clone(),
            },
        }
    }

    fn sub_title_for(&self, row: &PoolRow) -> String {
        match &self.sub_title {
            SubTitle::Fixed(label) => label.clone(),
            SubTitle::PerNetwork(network) => {
                let dex = row.dex_id.as_deref().unwrap_or("DEX");
                format!("{} • {}", dex, network)
            }
        }
    }
}

/// `$1.23M`, `$4.56K` or `$7.89`. Non-finite input renders as `$0.00`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }

    if value >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.2}K", value / 1_000.0)
    } else {
        format!("${:.2}", value)
    }
}

/// Pulls the two token symbols out of a pair label such as `"USDT / WETH 0.05%"`.
///
/// Each side keeps only the text before its first space, which drops fee
/// annotations. Returns `None` when the label has no `" / "` separator.
pub fn extract_tokens(name: &str) -> Option<[String; 2]> {
    let mut sides = name.split(PAIR_SEPARATOR);
    let first = sides.next()?;
    let second = sides.next()?;

    let symbol = |side: &str| side.split(' ').next().unwrap_or("").to_string();
    Some([symbol(first), symbol(second)])
}
