use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use crate::config::GeckoConfig;
use crate::models::{parse_amount, Network, PoolRow};
use super::{MarketDataSource, SourceError};

const ACCEPT_VERSIONED: &str = "application/json;version=20230302";

/// GeckoTerminal public API (v2).
pub struct GeckoTerminal {
    client: Client,
    base_url: Url,
    max_network_pages: u32,
}

#[derive(Debug, Deserialize)]
struct GeckoResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    links: Option<GeckoLinks>,
}

#[derive(Debug, Deserialize)]
struct GeckoLinks {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeckoNetwork {
    id: String,
    #[serde(default)]
    attributes: GeckoNetworkAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct GeckoNetworkAttributes {
    name: Option<String>,
    coingecko_asset_platform_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeckoPool {
    id: Option<String>,
    #[serde(default)]
    attributes: GeckoPoolAttributes,
    relationships: Option<GeckoRelationships>,
}

#[derive(Debug, Default, Deserialize)]
struct GeckoPoolAttributes {
    name: Option<String>,
    address: Option<String>,
    pool_created_at: Option<String>,
    base_token_price_usd: Option<Value>,
    quote_token_price_usd: Option<Value>,
    fdv_usd: Option<Value>,
    market_cap_usd: Option<Value>,
    reserve_in_usd: Option<Value>,
    price_change_percentage: Option<GeckoWindows>,
    volume_usd: Option<GeckoWindows>,
    transactions: Option<GeckoTransactions>,
}

#[derive(Debug, Deserialize)]
struct GeckoWindows {
    h1: Option<Value>,
    h24: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GeckoTransactions {
    h24: Option<GeckoTxCounts>,
}

#[derive(Debug, Deserialize)]
struct GeckoTxCounts {
    buys: Option<Value>,
    sells: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GeckoRelationships {
    base_token: Option<GeckoRelation>,
    quote_token: Option<GeckoRelation>,
    dex: Option<GeckoRelation>,
}

#[derive(Debug, Deserialize)]
struct GeckoRelation {
    data: Option<GeckoRelationData>,
}

#[derive(Debug, Deserialize)]
struct GeckoRelationData {
    id: String,
}

impl<T> GeckoResponse<T> {
    fn has_next_page(&self) -> bool {
        self.links
            .as_ref()
            .and_then(|l| l.next.as_deref())
            .is_some_and(|next| !next.is_empty())
    }
}

fn relation_id(relation: Option<&GeckoRelation>) -> Option<String> {
    relation
        .and_then(|r| r.data.as_ref())
        .map(|d| d.id.clone())
}

impl From<GeckoNetwork> for Network {
    fn from(n: GeckoNetwork) -> Self {
        Network {
            id: n.id,
            name: n.attributes.name,
            coingecko_asset_platform_id: n.attributes.coingecko_asset_platform_id,
        }
    }
}

impl From<GeckoPool> for PoolRow {
    fn from(p: GeckoPool) -> Self {
        let a = p.attributes;
        let rel = p.relationships.as_ref();
        let price_change = a.price_change_percentage.as_ref();
        let volume = a.volume_usd.as_ref();
        let tx_h24 = a.transactions.as_ref().and_then(|t| t.h24.as_ref());

        PoolRow {
            id: p.id,
            address: a.address,
            name: a.name,
            pool_created_at: a.pool_created_at,
            base_token_price_usd: parse_amount(a.base_token_price_usd.as_ref()),
            quote_token_price_usd: parse_amount(a.quote_token_price_usd.as_ref()),
            fdv_usd: parse_amount(a.fdv_usd.as_ref()),
            market_cap_usd: parse_amount(a.market_cap_usd.as_ref()),
            reserve_in_usd: parse_amount(a.reserve_in_usd.as_ref()),
            price_change_percentage_h1: parse_amount(price_change.and_then(|w| w.h1.as_ref())),
            price_change_percentage_h24: parse_amount(price_change.and_then(|w| w.h24.as_ref())),
            volume_usd_h1: parse_amount(volume.and_then(|w| w.h1.as_ref())),
            volume_usd_h24: parse_amount(volume.and_then(|w| w.h24.as_ref())),
            transactions_h24_buys: tx_h24.and_then(|t| t.buys.as_ref()).and_then(Value::as_u64),
            transactions_h24_sells: tx_h24.and_then(|t| t.sells.as_ref()).and_then(Value::as_u64),
            base_token_id: relation_id(rel.and_then(|r| r.base_token.as_ref())),
            quote_token_id: relation_id(rel.and_then(|r| r.quote_token.as_ref())),
            dex_id: relation_id(rel.and_then(|r| r.dex.as_ref())),
        }
    }
}

impl GeckoTerminal {
    pub fn new(config: &GeckoConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SourceError::Parse(format!("invalid base url {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::Parse(format!("invalid base url {}", config.base_url)));
        }

        Ok(Self {
            client,
            base_url,
            max_network_pages: config.max_network_pages,
        })
    }

    /// Appends `segments` to the base path, each percent-encoded as a single segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_document<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        tracing::debug!("GET {}", url);

        let resp = self.client.get(url.clone())
            .header(ACCEPT, ACCEPT_VERSIONED)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("GeckoTerminal request failed: {}", e);
                SourceError::Network(e.to_string())
            })?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("GeckoTerminal rate limit hit: {}", url);
            return Err(SourceError::RateLimit);
        }

        if !status.is_success() {
            tracing::warn!("GeckoTerminal returned {} for {}", status, url);
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))
    }

    async fn fetch_pools(&self, url: Url) -> Result<Vec<PoolRow>, SourceError> {
        let doc: GeckoResponse<GeckoPool> = self.get_document(url).await?;
        Ok(doc.data.into_iter().map(PoolRow::from).collect())
    }
}

#[async_trait]
impl MarketDataSource for GeckoTerminal {
    fn name(&self) -> &'static str {
        "GeckoTerminal"
    }

    async fn list_networks(&self) -> Result<Vec<Network>, SourceError> {
        let mut networks = Vec::new();
        let mut page = 1u32;
        let mut filled_pages = 0u32;

        loop {
            let mut url = self.endpoint(&["networks"]);
            url.query_pairs_mut().append_pair("page", &page.to_string());
            let doc: GeckoResponse<GeckoNetwork> = self.get_document(url).await?;
            let has_next = doc.has_next_page();

            if doc.data.is_empty() {
                break;
            }
            networks.extend(doc.data.into_iter().map(Network::from));
            filled_pages += 1;

            if !has_next || page >= self.max_network_pages {
                break;
            }
            page += 1;
        }

        tracing::debug!("Fetched {} networks across {} page(s)", networks.len(), filled_pages);
        Ok(networks)
    }

    async fn list_top_pools(&self, network_id: &str) -> Result<Vec<PoolRow>, SourceError> {
        let url = self.endpoint(&["networks", network_id, "pools"]);
        self.fetch_pools(url).await
    }

    async fn list_top_pools_for_token(
        &self,
        network_id: &str,
        token_address: &str,
    ) -> Result<Vec<PoolRow>, SourceError> {
        let url = self.endpoint(&["networks", network_id, "tokens", token_address, "pools"]);
        self.fetch_pools(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode as HttpStatus,
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_pools() -> Value {
        json!({
            "data": [
                {
                    "id": "sepolia-testnet_0xabc",
                    "type": "pool",
                    "attributes": {
                        "name": "USDT / WETH 0.05%",
                        "address": "0xabc",
                        "pool_created_at": "2024-03-01T10:00:00Z",
                        "base_token_price_usd": "1.0001",
                        "quote_token_price_usd": 3012.55,
                        "fdv_usd": null,
                        "reserve_in_usd": "254301.7781",
                        "price_change_percentage": {"m5": "0", "h1": "0.12", "h24": "-2.4"},
                        "volume_usd": {"h1": "10.5", "h24": "15820.11"},
                        "transactions": {"h24": {"buys": 12, "sells": 9, "buyers": 7}}
                    },
                    "relationships": {
                        "base_token": {"data": {"id": "sepolia-testnet_0x03ef", "type": "token"}},
                        "quote_token": {"data": {"id": "sepolia-testnet_0xfff9", "type": "token"}},
                        "dex": {"data": {"id": "uniswap_v3_sepolia", "type": "dex"}}
                    }
                },
                {
                    "id": "sepolia-testnet_0xdef",
                    "type": "pool",
                    "attributes": {
                        "name": "USDT / LINK 1%",
                        "address": "0xdef",
                        "reserve_in_usd": "abc",
                        "price_change_percentage": {"h24": null}
                    }
                }
            ]
        })
    }

    #[derive(Deserialize)]
    struct PageQuery {
        page: Option<u32>,
    }

    async fn networks(Query(q): Query<PageQuery>) -> Json<Value> {
        let page = q.page.unwrap_or(1);
        let doc = match page {
            1 => json!({
                "data": [
                    {"id": "eth", "type": "network", "attributes": {"name": "Ethereum", "coingecko_asset_platform_id": "ethereum"}},
                    {"id": "bsc", "type": "network", "attributes": {"name": "BNB Chain", "coingecko_asset_platform_id": "binance-smart-chain"}}
                ],
                "links": {"next": "https://api.geckoterminal.com/api/v2/networks?page=2"}
            }),
            2 => json!({
                "data": [
                    {"id": "sepolia-testnet", "type": "network", "attributes": {"name": "Ethereum Sepolia Testnet", "coingecko_asset_platform_id": null}}
                ],
                "links": {"next": "https://api.geckoterminal.com/api/v2/networks?page=3"}
            }),
            3 => json!({
                "data": [],
                "links": {"next": "https://api.geckoterminal.com/api/v2/networks?page=4"}
            }),
            4 => json!({
                "data": [
                    {"id": "after-empty-page", "type": "network", "attributes": {"name": "Unreachable"}}
                ],
                "links": {"next": null}
            }),
            _ => json!({"data": []}),
        };
        Json(doc)
    }

    fn echo_pool(id: &str) -> Response {
        Json(json!({"data": [{"id": id, "type": "pool", "attributes": {}}]})).into_response()
    }

    async fn network_pools(Path(network): Path<String>) -> Response {
        match network.as_str() {
            n if n.contains('/') => echo_pool(n),
            "broken" => (HttpStatus::INTERNAL_SERVER_ERROR, "boom").into_response(),
            "html" => (HttpStatus::OK, "<html>maintenance</html>").into_response(),
            _ => Json(sample_pools()).into_response(),
        }
    }

    async fn token_pools(Path((network, token)): Path<(String, String)>) -> Response {
        if token.contains('/') {
            return echo_pool(&format!("{} {}", network, token));
        }
        match network.as_str() {
            "busy" => (HttpStatus::TOO_MANY_REQUESTS, "slow down").into_response(),
            "empty" => Json(json!({"data": []})).into_response(),
            _ => Json(sample_pools()).into_response(),
        }
    }

    async fn spawn_fake_gecko() -> String {
        let app = Router::new()
            .route("/api/v2/networks", get(networks))
            .route("/api/v2/networks/:network/pools", get(network_pools))
            .route("/api/v2/networks/:network/tokens/:token/pools", get(token_pools));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/api/v2/", addr)
    }

    fn client(base_url: String, max_network_pages: u32) -> GeckoTerminal {
        GeckoTerminal::new(&GeckoConfig {
            base_url,
            timeout_secs: 5,
            max_network_pages,
        })
        .unwrap()
    }

    #[test]
    fn flattens_pool_documents() {
        let doc: GeckoResponse<GeckoPool> = serde_json::from_value(sample_pools()).unwrap();
        let rows: Vec<PoolRow> = doc.data.into_iter().map(PoolRow::from).collect();

        assert_eq!(
            rows[0],
            PoolRow {
                id: Some("sepolia-testnet_0xabc".to_string()),
                address: Some("0xabc".to_string()),
                name: Some("USDT / WETH 0.05%".to_string()),
                pool_created_at: Some("2024-03-01T10:00:00Z".to_string()),
                base_token_price_usd: Some(1.0001),
                quote_token_price_usd: Some(3012.55),
                fdv_usd: None,
                market_cap_usd: None,
                reserve_in_usd: Some(254301.7781),
                price_change_percentage_h1: Some(0.12),
                price_change_percentage_h24: Some(-2.4),
                volume_usd_h1: Some(10.5),
                volume_usd_h24: Some(15820.11),
                transactions_h24_buys: Some(12),
                transactions_h24_sells: Some(9),
                base_token_id: Some("sepolia-testnet_0x03ef".to_string()),
                quote_token_id: Some("sepolia-testnet_0xfff9".to_string()),
                dex_id: Some("uniswap_v3_sepolia".to_string()),
            }
        );

        assert_eq!(rows[1].reserve_in_usd, None);
        assert_eq!(rows[1].price_change_percentage_h24, None);
        assert_eq!(rows[1].base_token_id, None);
    }

    #[tokio::test]
    async fn walks_network_pages() {
        let gecko = client(spawn_fake_gecko().await, 10);

        let networks = gecko.list_networks().await.unwrap();

        let ids: Vec<&str> = networks.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["eth", "bsc", "sepolia-testnet"]);
        assert_eq!(networks[2].coingecko_asset_platform_id, None);
    }

    #[tokio::test]
    async fn empty_page_ends_network_walk() {
        let gecko = client(spawn_fake_gecko().await, 10);

        let networks = gecko.list_networks().await.unwrap();

        assert_eq!(networks.len(), 3);
        assert!(networks.iter().all(|n| n.id != "after-empty-page"));
    }

    #[tokio::test]
    async fn network_pages_are_capped() {
        let gecko = client(spawn_fake_gecko().await, 1);

        let networks = gecko.list_networks().await.unwrap();

        assert_eq!(networks.len(), 2);
    }

    #[tokio::test]
    async fn fetches_top_pools() {
        let gecko = client(spawn_fake_gecko().await, 10);

        let rows = gecko.list_top_pools("sepolia-testnet").await.unwrap();
        assert_eq!(rows.len(), 2);

        let rows = gecko
            .list_top_pools_for_token("sepolia-testnet", "0x03efd625304e7119b80463be5a677c121c2232bc")
            .await
            .unwrap();
        assert_eq!(rows[0].name.as_deref(), Some("USDT / WETH 0.05%"));

        let rows = gecko.list_top_pools_for_token("empty", "0x0").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn ids_with_slashes_stay_one_path_segment() {
        let gecko = client(spawn_fake_gecko().await, 10);

        let rows = gecko.list_top_pools("busy/tokens/0x0").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id.as_deref(), Some("busy/tokens/0x0"));

        let rows = gecko.list_top_pools_for_token("eth", "0xdead/pools").await.unwrap();
        assert_eq!(rows[0].id.as_deref(), Some("eth 0xdead/pools"));
    }

    #[test]
    fn endpoint_encodes_each_segment() {
        let gecko = client("https://api.geckoterminal.com/api/v2/".to_string(), 10);

        let url = gecko.endpoint(&["networks", "eth/tokens/0xdead", "pools"]);

        assert_eq!(
            url.as_str(),
            "https://api.geckoterminal.com/api/v2/networks/eth%2Ftokens%2F0xdead/pools"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let err = GeckoTerminal::new(&GeckoConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
            max_network_pages: 10,
        })
        .err()
        .unwrap();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[tokio::test]
    async fn upstream_failures_propagate() {
        let gecko = client(spawn_fake_gecko().await, 10);

        let err = gecko.list_top_pools("broken").await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 500, .. }));

        let err = gecko.list_top_pools("html").await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));

        let err = gecko.list_top_pools_for_token("busy", "0x0").await.unwrap_err();
        assert!(matches!(err, SourceError::RateLimit));
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gecko = client(format!("http://{}/api/v2", addr), 10);

        let err = gecko.list_networks().await.unwrap_err();
        assert!(matches!(err, SourceError::Network(_)));
    }
}
