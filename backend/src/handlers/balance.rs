//! HTTP handlers for the running balance

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::balance::BalanceView;
use crate::services::BalanceService;
use crate::AppState;

/// Read the current balance snapshot
pub async fn get_balance(State(state): State<AppState>) -> AppResult<Json<BalanceView>> {
    let service = BalanceService::new(state.db);
    let balance = service.read().await?;
    Ok(Json(balance))
}
