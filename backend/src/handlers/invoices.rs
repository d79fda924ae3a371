//! HTTP handlers for invoice management

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::invoice::{
    CreateInvoiceInput, EditInvoiceInput, Invoice, InvoiceDetail, InvoiceFilter, InvoiceListRow,
};
use crate::services::InvoiceService;
use crate::AppState;

/// Create an invoice
pub async fn create_invoice(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateInvoiceInput>,
) -> AppResult<Json<InvoiceDetail>> {
    let service = InvoiceService::new(state.db);
    let invoice = service.create(current_user.0.user_id, input).await?;
    Ok(Json(invoice))
}

/// List invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(filter): Query<InvoiceFilter>,
) -> AppResult<Json<Vec<InvoiceListRow>>> {
    let service = InvoiceService::new(state.db);
    let invoices = service.list(filter).await?;
    Ok(Json(invoices))
}

/// Get an invoice
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<InvoiceDetail>> {
    let service = InvoiceService::new(state.db);
    let invoice = service.get_by_id(invoice_id).await?;
    Ok(Json(invoice))
}

/// Edit an invoice
pub async fn edit_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(input): Json<EditInvoiceInput>,
) -> AppResult<Json<InvoiceDetail>> {
    let service = InvoiceService::new(state.db);
    let invoice = service.edit(invoice_id, input).await?;
    Ok(Json(invoice))
}

/// Soft-delete an invoice
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<Invoice>> {
    let service = InvoiceService::new(state.db);
    let invoice = service.delete(invoice_id).await?;
    Ok(Json(invoice))
}
