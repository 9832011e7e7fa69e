use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use crate::config::PairConfig;
use crate::models::{to_column_map, PoolCard};
use crate::services::PoolCardFormatter;
use crate::sources::MarketDataSource;
use super::error::ApiError;

pub struct AppState {
    pub source: Arc<dyn MarketDataSource>,
    pub featured_pair: PairConfig,
}

impl AppState {
    pub fn new(source: Arc<dyn MarketDataSource>, featured_pair: PairConfig) -> Self {
        Self { source, featured_pair }
    }
}

#[derive(Serialize)]
struct PoolCardsResponse {
    data: Vec<PoolCard>,
}

/// GET / - liveness
async fn root() -> Json<Value> {
    Json(json!({"Hello": "World"}))
}

/// GET /gecko/networks
async fn get_networks(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let networks = state.source.list_networks().await?;
    tracing::debug!("{} returned {} networks", state.source.name(), networks.len());

    Ok(Json(json!({"networks": to_column_map(&networks)?})))
}

/// GET /gecko/address/:network_id - top pools of a network, unformatted
async fn get_network_pools(
    State(state): State<Arc<AppState>>,
    Path(network_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let pools = state.source.list_top_pools(&network_id).await?;
    tracing::debug!("{} returned {} pools for {}", state.source.name(), pools.len(), network_id);

    Ok(Json(json!({"address_data": to_column_map(&pools)?})))
}

/// GET /gecko/pool/usdt - pool cards for the configured pair
async fn get_featured_pool_cards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PoolCardsResponse>, ApiError> {
    let pair = &state.featured_pair;
    let pools = state.source
        .list_top_pools_for_token(&pair.network, &pair.token_address)
        .await?;

    let formatter = PoolCardFormatter::with_sub_title(pair.sub_title.as_str());
    Ok(Json(PoolCardsResponse {
        data: formatter.format_cards(&pools),
    }))
}

/// GET /gecko/pool/:network_id/:token_address - pool cards for any pair
async fn get_pool_cards(
    State(state): State<Arc<AppState>>,
    Path((network_id, token_address)): Path<(String, String)>,
) -> Result<Json<PoolCardsResponse>, ApiError> {
    let pools = state.source
        .list_top_pools_for_token(&network_id, &token_address)
        .await?;

    let formatter = PoolCardFormatter::for_network(network_id);
    Ok(Json(PoolCardsResponse {
        data: formatter.format_cards(&pools),
    }))
}

pub fn create_rest_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/gecko/networks", get(get_networks))
        .route("/gecko/address/:network_id", get(get_network_pools))
        .route("/gecko/pool/usdt", get(get_featured_pool_cards))
        .route("/gecko/pool/:network_id/:token_address", get(get_pool_cards))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
