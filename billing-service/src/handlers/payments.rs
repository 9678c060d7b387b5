//! Payment handlers.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use service_core::error::AppError;

use crate::{
    dtos::{PaymentResponse, RecordPaymentRequest},
    middleware::VendorContext,
    services::payments,
    AppState,
};

pub async fn record_payment(
    State(state): State<AppState>,
    vendor: VendorContext,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    payload.validate()?;

    tracing::info!(
        vendor_id = %vendor.vendor_id,
        payment_type = payload.payment_type.as_str(),
        related_to = payload.related_to.as_str(),
        related_id = %payload.related_id,
        amount = payload.amount,
        "Recording payment"
    );

    let payment = payments::record_payment(&state.repository, &vendor.vendor_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}
