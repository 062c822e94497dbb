//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Cache and store round-trip

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use stockroom_core::storage::ShopRepository;

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Cache and store round-trip.
///
/// Returns 200 when both backends answer, 503 otherwise. A cache outage does
/// not stop dashboards from being served, but it is still reported here.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Response {
    let (cache_ok, store) = tokio::join!(state.cache.ping(), state.store.list_shops(true));

    let store_ok = match store {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Store health check failed");
            false
        }
    };
    let healthy = cache_ok && store_ok;

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "healthy": healthy,
            "cache": cache_ok,
            "store": store_ok,
            "warmer": state.warmer.is_running(),
        })),
    )
        .into_response()
}
