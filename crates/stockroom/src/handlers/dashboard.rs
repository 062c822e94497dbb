use axum::{
    extract::{Path, Query, State},
    Json,
};

use stockroom_core::dashboard::{ComposedDashboard, DashboardQuery, Slice};

use crate::{handlers::AppError, state::AppState};

/// Composed dashboard (GET /api/dashboard).
///
/// Query parameters: `startDate`, `endDate`, `period`, `shopId`. Failed
/// slices are listed in `errors`; only unusable filters fail the request.
#[axum::debug_handler]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ComposedDashboard>, AppError> {
    let dashboard = state.composer.compose(&query).await?;
    Ok(Json(dashboard))
}

/// A single dashboard slice (GET /api/dashboard/{slice}).
#[axum::debug_handler]
pub async fn get_slice(
    State(state): State<AppState>,
    Path(slice): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let slice: Slice = slice.parse()?;
    let filters = query.filters()?;

    let result = state
        .composer
        .slice(slice, query.scope(), &filters)
        .await?;
    Ok(Json(result))
}
