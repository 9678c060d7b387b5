//! Outstanding / reconciliation handlers.

use axum::{
    extract::{Path, State},
    Json,
};

use service_core::error::AppError;

use crate::{
    dtos::{OutstandingInvoiceResponse, SocietyOutstandingResponse, SupplierOutstandingResponse},
    middleware::VendorContext,
    models::round2,
    services::outstanding,
    AppState,
};

pub async fn supplier_outstanding(
    State(state): State<AppState>,
    vendor: VendorContext,
    Path(supplier_id): Path<String>,
) -> Result<Json<SupplierOutstandingResponse>, AppError> {
    let summary =
        outstanding::supplier_outstanding(&state.repository, &vendor.vendor_id, &supplier_id)
            .await?;

    Ok(Json(SupplierOutstandingResponse {
        supplier_id,
        total_collections: summary.total_collections,
        total_paid: summary.total_paid,
        outstanding: summary.outstanding,
        unpaid_collections: summary
            .unpaid_collections
            .into_iter()
            .map(Into::into)
            .collect(),
    }))
}

pub async fn society_outstanding(
    State(state): State<AppState>,
    vendor: VendorContext,
    Path(society_id): Path<String>,
) -> Result<Json<SocietyOutstandingResponse>, AppError> {
    let summary =
        outstanding::society_outstanding(&state.repository, &vendor.vendor_id, &society_id).await?;

    let outstanding_invoices = summary
        .invoices
        .into_iter()
        .map(|(inv, paid)| OutstandingInvoiceResponse {
            id: inv.id,
            invoice_number: inv.invoice_number,
            status: inv.status,
            total: inv.total,
            paid,
            outstanding: round2(inv.total - paid),
            created_at: inv.created_at.to_chrono(),
        })
        .collect();

    Ok(Json(SocietyOutstandingResponse {
        society_id,
        outstanding_invoices,
        total_invoiced: summary.total_invoiced,
        total_paid: summary.total_paid,
        total_outstanding: summary.total_outstanding,
        unbilled_deliveries: summary
            .unbilled_deliveries
            .into_iter()
            .map(Into::into)
            .collect(),
        unbilled_amount: summary.unbilled_amount,
    }))
}
