//! # Proxy
//!
//! Public side of the leaderboard. Relays `/api/scores` to the score store
//! and hands back whatever status and JSON body the store answered with.
//!
//! - Adds `X-Forwarded-For` so the store records the real client
//! - No retries, no caching, no validation
//! - Any network or decode failure becomes `500 {"error": ..}`
use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use reqwest::RequestBuilder;
use serde_json::Value;

use crate::{
    error::ProxyError,
    state::ProxyState,
    utils::{FORWARDED_FOR, client_ip},
};

pub async fn proxy_scores_handler(
    State(state): State<Arc<ProxyState>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, ProxyError> {
    let request = state
        .client
        .get(state.config.scores_url())
        .header(FORWARDED_FOR, client_ip(&headers, remote));

    relay(request).await
}

pub async fn proxy_add_score_handler(
    State(state): State<Arc<ProxyState>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let request = state
        .client
        .post(state.config.scores_url())
        .header(FORWARDED_FOR, client_ip(&headers, remote))
        .header(CONTENT_TYPE, "application/json")
        .body(body);

    relay(request).await
}

async fn relay(request: RequestBuilder) -> Result<Response, ProxyError> {
    let response = request.send().await?;
    let status = response.status();
    let body: Value = response.json().await?;

    Ok((status, Json(body)).into_response())
}
