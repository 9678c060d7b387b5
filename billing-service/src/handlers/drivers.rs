//! Driver attendance and salary handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use service_core::error::AppError;

use crate::{
    dtos::{
        parse_date, AttendanceResponse, AttendanceSummaryResponse, MarkAttendanceRequest,
        SalaryQuery, SalaryResponse,
    },
    middleware::VendorContext,
    services::{salary, BillingStore},
    AppState,
};

/// Mark a driver's attendance for a day. Upsert: marking the same day twice
/// overwrites the earlier status rather than erroring.
pub async fn mark_attendance(
    State(state): State<AppState>,
    vendor: VendorContext,
    Path(driver_id): Path<String>,
    Json(payload): Json<MarkAttendanceRequest>,
) -> Result<(StatusCode, Json<AttendanceResponse>), AppError> {
    payload.validate()?;
    let date = parse_date("date", &payload.date)?;

    let record = state
        .repository
        .upsert_attendance(
            &vendor.vendor_id,
            &driver_id,
            date,
            payload.status,
            payload.note,
        )
        .await?;

    tracing::info!(
        driver_id = %driver_id,
        vendor_id = %vendor.vendor_id,
        date = %date,
        status = record.status.as_str(),
        "Attendance marked"
    );

    Ok((StatusCode::OK, Json(AttendanceResponse::from(record))))
}

pub async fn get_salary(
    State(state): State<AppState>,
    vendor: VendorContext,
    Path(driver_id): Path<String>,
    Query(query): Query<SalaryQuery>,
) -> Result<Json<SalaryResponse>, AppError> {
    let (driver, breakdown) =
        salary::calculate_salary(&state.repository, &vendor.vendor_id, &driver_id, &query.month)
            .await?;

    Ok(Json(SalaryResponse {
        driver_id: driver.id,
        month: query.month,
        attendance: AttendanceSummaryResponse {
            present_days: breakdown.attendance.present_days,
            half_days: breakdown.attendance.half_days,
            absent_days: breakdown.attendance.absent_days,
            attendance_units: breakdown.attendance.units(),
        },
        daily_wage: breakdown.daily_wage,
        gross_pay: breakdown.gross_pay,
        driver_expenses: breakdown.driver_expenses,
        net_pay: breakdown.net_pay,
    }))
}
