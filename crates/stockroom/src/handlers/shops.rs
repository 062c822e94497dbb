use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use stockroom_core::retail::Shop;
use stockroom_core::storage::ShopRepository;

use crate::{handlers::AppError, state::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListShopsParams {
    #[serde(default)]
    pub active_only: bool,
}

/// List shops (GET /api/shops).
///
/// Clients use the ids as `shopId` on the dashboard endpoints.
pub async fn list_shops(
    State(state): State<AppState>,
    Query(params): Query<ListShopsParams>,
) -> Result<Json<Vec<Shop>>, AppError> {
    let shops = state.store.list_shops(params.active_only).await?;
    Ok(Json(shops))
}
