//! Write endpoints for the records the dashboard aggregates.
//!
//! Every write goes through the cache-busting store, so the affected shop's
//! dashboard entries and the global ones are dropped once the write succeeds.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use stockroom_core::retail::{
    CreateInventoryItemRequest, CreateInvoiceRequest, CreateTransferRequest,
};
use stockroom_core::storage::{InventoryRepository, InvoiceRepository, TransferRepository};

use crate::{handlers::AppError, state::AppState};

/// Record an invoice (POST /api/invoices).
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = payload.into_invoice()?;
    state.store.create_invoice(&invoice).await?;

    tracing::info!(invoice_id = %invoice.id, shop_id = %invoice.shop_id, "Recorded invoice");

    Ok((StatusCode::CREATED, Json(invoice)))
}

/// Record a stock transfer (POST /api/transfers).
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransferRequest>,
) -> Result<impl IntoResponse, AppError> {
    let transfer = payload.into_transfer()?;
    state.store.create_transfer(&transfer).await?;

    tracing::info!(
        transfer_id = %transfer.id,
        from = %transfer.from_shop_id,
        to = %transfer.to_shop_id,
        "Recorded transfer"
    );

    Ok((StatusCode::CREATED, Json(transfer)))
}

/// Add a stock line (POST /api/inventory).
pub async fn create_inventory_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item = payload.into_item()?;
    state.store.create_inventory_item(&item).await?;

    tracing::info!(item_id = %item.id, shop_id = %item.shop_id, sku = %item.sku, "Added stock line");

    Ok((StatusCode::CREATED, Json(item)))
}
