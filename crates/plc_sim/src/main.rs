use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use shared::protocol::JsonRpcResponse;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{parse_error, Register, WrittenSignal};
use app_state::AppState;
use config::load_settings;

#[derive(Debug, Serialize)]
struct StatusResponse {
    writes: u64,
    last: Option<WrittenSignal>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .init();

    let settings = load_settings()?;
    let state = AppState {
        register: RwLock::new(Register::new(settings.reject_values.iter().copied())),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, reject_values = ?settings.reject_values, "plc simulator listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// `RUST_LOG` when it parses, `info` otherwise.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(json_rpc))
        .route("/plc-control", post(json_rpc))
        .route("/status", get(status))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn json_rpc(State(state): State<Arc<AppState>>, body: Bytes) -> Json<JsonRpcResponse> {
    let request: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            warn!(%error, "rejecting unparseable request body");
            return Json(parse_error());
        }
    };

    let response = state.register.write().await.handle(&request);
    match &response.error {
        Some(error) => warn!(code = error.code, message = %error.message, "writeValue refused"),
        None => info!(id = ?response.id, result = ?response.result, "writeValue applied"),
    }
    Json(response)
}

async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let register = state.register.read().await;
    Json(StatusResponse {
        writes: register.writes(),
        last: register.last(),
    })
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
