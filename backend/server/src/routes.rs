use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use ledger::{LEADERBOARD_SIZE, ScoreRecord};
use serde_json::json;
use tracing::info;

use crate::{
    error::AppError,
    state::StoreState,
    utils::{client_ip, get_score_from_body},
};

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn scores_handler(State(state): State<Arc<StoreState>>) -> impl IntoResponse {
    Json(state.ledger.top(LEADERBOARD_SIZE))
}

pub async fn add_score_handler(
    State(state): State<Arc<StoreState>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let score = get_score_from_body(&body)?;
    let record = ScoreRecord::new(score, client_ip(&headers, remote));

    state.ledger.append(&record).map_err(AppError::SaveFailed)?;

    info!("Saved score {} from {}", record.score, record.ip);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": record })),
    ))
}
