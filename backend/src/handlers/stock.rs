//! HTTP handlers for stock movements

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::invoice::Invoice;
use crate::services::stock::{ProductStock, StockFilter, StockMovement};
use crate::services::StockService;
use crate::AppState;

#[derive(Deserialize)]
pub struct StockInRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Restock a product
pub async fn stock_in(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<StockInRequest>,
) -> AppResult<Json<ProductStock>> {
    let service = StockService::new(state.db);
    let product = service
        .stock_in(input.product_id, input.quantity, current_user.0.user_id)
        .await?;
    Ok(Json(product))
}

/// Deduct stock for a fulfilled invoice
pub async fn deduct_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(invoice_number): Path<String>,
) -> AppResult<Json<Invoice>> {
    let service = StockService::new(state.db);
    let invoice = service
        .deduct_by_invoice(&invoice_number, current_user.0.user_id)
        .await?;
    Ok(Json(invoice))
}

/// Stock movement history
pub async fn stock_history(
    State(state): State<AppState>,
    Query(filter): Query<StockFilter>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = StockService::new(state.db);
    let movements = service.history(filter).await?;
    Ok(Json(movements))
}
