//! Invoice handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use service_core::error::AppError;

use crate::{
    dtos::{GenerateInvoiceRequest, InvoiceResponse},
    middleware::VendorContext,
    services::{invoicing, BillingStore},
    AppState,
};

/// Generate an invoice from the counterparty's billable records over a
/// period. Empty selection is a hard failure, not an empty invoice.
pub async fn generate_invoice(
    State(state): State<AppState>,
    vendor: VendorContext,
    Json(payload): Json<GenerateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    payload.validate()?;

    tracing::info!(
        vendor_id = %vendor.vendor_id,
        related_to = payload.related_to.as_str(),
        related_id = %payload.related_id,
        start_date = %payload.start_date,
        end_date = %payload.end_date,
        "Generating invoice"
    );

    let invoice =
        invoicing::generate_invoice(&state.repository, &vendor.vendor_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    vendor: VendorContext,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let invoice = state
        .repository
        .get_invoice(&vendor.vendor_id, invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

    Ok(Json(InvoiceResponse::from(invoice)))
}

/// Explicit draft → sent transition; only sent invoices count as owed.
pub async fn send_invoice(
    State(state): State<AppState>,
    vendor: VendorContext,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let invoice = invoicing::send_invoice(&state.repository, &vendor.vendor_id, invoice_id).await?;
    Ok(Json(InvoiceResponse::from(invoice)))
}
