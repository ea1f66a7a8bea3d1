//! Documentation of a two-tier game leaderboard.
//!
//!
//!
//! # General Infrastructure
//! - Browser game posts finished scores to the public proxy
//! - Proxy forwards into the score store on the internal network
//! - Store appends each score to a flat text file and serves the top 10
//! - Only the proxy is exposed, the store port stays on the private subnet
//!
//!
//!
//! # Services
//!
//! ## Score Store
//! | Method | Path | Response |
//! |---|---|---|
//! | GET | `/health` | `200 OK` |
//! | GET | `/api/scores` | `200 [{score, timestamp, ip}]`, at most 10, highest first |
//! | POST | `/api/scores` | `201 {success, data}`, `400 {error}`, `500 {error}` |
//!
//! ## Proxy
//! - Same paths as the store
//! - Adds `X-Forwarded-For`, keeping one the client already sent
//! - Upstream timeout of 5 seconds, failures come back as `500 {error}`
//!
//!
//!
//! # Notes
//!
//! ## Score file
//! No locking on the file. Two writers appending at once rely on the OS keeping
//! each short line intact. Good enough for a single game page, not for anything
//! that needs ordering or durability guarantees.
//!
//!
//!
//! # Setup
//!
//! Run the store.
//! ```sh
//! SCORE_FILE=/home/ec2-user/scores.txt cargo run --bin leaderboard -- store
//! ```
//!
//! Run the proxy.
//! ```sh
//! STORE_URL=http://10.0.28.54:5000 cargo run --bin leaderboard -- proxy
//! ```
//!
//! More logs.
//! ```sh
//! RUST_LOG=debug cargo run --bin leaderboard -- store
//! ```
use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

pub mod config;
pub mod error;
pub mod proxy;
pub mod routes;
pub mod state;
pub mod utils;

use config::{ProxyConfig, StoreConfig};
use proxy::{proxy_add_score_handler, proxy_scores_handler};
use routes::{add_score_handler, health_handler, scores_handler};
use state::{ProxyState, StoreState};

pub fn store_router(state: Arc<StoreState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/scores", get(scores_handler).post(add_score_handler))
        .layer(cors())
        .with_state(state)
}

pub fn proxy_router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/scores",
            get(proxy_scores_handler).post(proxy_add_score_handler),
        )
        .layer(cors())
        .with_state(state)
}

pub async fn start_store() -> anyhow::Result<()> {
    info!("Initializing store...");
    let state = StoreState::new(StoreConfig::load()?);

    if state.ledger.ensure_exists()? {
        info!("Created score file: {}", state.ledger.path().display());
    }
    info!("Score file: {}", state.ledger.path().display());

    let port = state.config.port;
    serve(store_router(state), port).await
}

pub async fn start_proxy() -> anyhow::Result<()> {
    info!("Initializing proxy...");
    let state = ProxyState::new(ProxyConfig::load()?)?;

    info!("Forwarding to {}", state.config.store_url);

    let port = state.config.port;
    serve(proxy_router(state), port).await
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

async fn serve(app: Router, port: u16) -> anyhow::Result<()> {
    let address = format!("0.0.0.0:{port}");
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
pub(crate) async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    address
}

#[cfg(test)]
pub(crate) fn test_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
