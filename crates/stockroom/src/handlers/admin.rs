//! Cache administration endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use stockroom_core::cache::dashboard_pattern;

use crate::{dashboard::WarmReport, state::AppState};

#[derive(Debug, Deserialize)]
pub struct InvalidateParams {
    /// Glob pattern; `*` matches any run of characters.
    pub pattern: Option<String>,
}

/// Invalidate cache entries by pattern (DELETE /api/admin/cache?pattern=...).
///
/// Without a pattern every dashboard entry is removed.
#[axum::debug_handler]
pub async fn invalidate_cache(
    State(state): State<AppState>,
    Query(params): Query<InvalidateParams>,
) -> Json<Value> {
    let pattern = params
        .pattern
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(dashboard_pattern);

    let removed = state.cache.invalidate_pattern(&pattern).await;
    tracing::info!(pattern = %pattern, removed, "Invalidated cache entries");

    Json(json!({ "pattern": pattern, "removed": removed }))
}

/// Run one warming cycle now (POST /api/admin/cache/warm).
#[axum::debug_handler]
pub async fn warm_cache(State(state): State<AppState>) -> Json<WarmReport> {
    Json(state.warmer.warm_all().await)
}
