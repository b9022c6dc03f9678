//! Single-route HTTP proxy in front of the transit API.
//!
//! The dashboard client never sees the transit credential: this process
//! holds it, injects it into the upstream request, and relays the JSON
//! body back. Any upstream failure (bad status, network error, body that
//! is not JSON) collapses to a fixed 500 so nothing upstream-specific
//! (least of all the credential) reaches the browser side.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::error;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::config::ProxyConfig;
use crate::error::FetchError;

pub const ERROR_BODY_TEXT: &str = "Failed to fetch transport data";

#[derive(Clone)]
pub struct ProxyState {
    config: Arc<ProxyConfig>,
    /// Bearer token for the transit API; kept out of logs and responses.
    credential: Arc<String>,
    client: reqwest::Client,
}

impl ProxyState {
    pub fn new(config: ProxyConfig, credential: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(crate::HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            config: Arc::new(config),
            credential: Arc::new(credential),
            client,
        })
    }
}

pub fn listen_addr(config: &ProxyConfig) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], config.port))
}

/// Missing or non-numeric coordinates fail extraction and give the caller
/// a 400 before any upstream round trip.
#[derive(Debug, Deserialize)]
struct PositionQuery {
    latitude: f64,
    longitude: f64,
}

/// The dashboard is served from a different origin/port, so CORS stays
/// wide open.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/api/transport", get(transport_departures))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn transport_departures(
    State(state): State<ProxyState>,
    Query(position): Query<PositionQuery>,
) -> Response {
    match fetch_upstream(&state, &position).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => {
            error!("transport upstream request failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": ERROR_BODY_TEXT })),
            )
                .into_response()
        }
    }
}

fn upstream_url(config: &ProxyConfig, position: &PositionQuery) -> String {
    format!(
        "{}/departure_mon?outputFormat=rapidJSON&coordOutputFormat=EPSG:4326&mode=direct&type_dm=stop&name_dm={},{}&radius_dm={}&TfNSWDM=true",
        config.upstream_base_url, position.latitude, position.longitude, config.radius_m
    )
}

async fn fetch_upstream(
    state: &ProxyState,
    position: &PositionQuery,
) -> Result<Value, FetchError> {
    let response = state
        .client
        .get(upstream_url(&state.config, position))
        .header("Authorization", format!("apikey {}", state.credential))
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::UpstreamStatus(response.status()));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(FetchError::parse)
}
