//! Expense handlers. The fuel policy is enforced here, at assignment time:
//! a fuel expense can never be charged to a driver.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::DateTime;
use uuid::Uuid;
use validator::Validate;

use service_core::error::AppError;

use crate::{
    dtos::{parse_date, CreateExpenseRequest, ExpenseResponse, UpdateExpenseStatusRequest},
    middleware::VendorContext,
    models::{expense::validate_charge_policy, round2, Expense, ExpenseStatus},
    services::BillingStore,
    AppState,
};

pub async fn create_expense(
    State(state): State<AppState>,
    vendor: VendorContext,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseResponse>), AppError> {
    payload.validate()?;
    validate_charge_policy(payload.category, payload.charged_to)
        .map_err(|msg| AppError::BadRequest(anyhow::anyhow!(msg)))?;
    let expense_date = parse_date("expense_date", &payload.expense_date)?;

    let now = DateTime::now();
    let expense = Expense {
        id: Uuid::new_v4(),
        vendor_id: vendor.vendor_id.clone(),
        driver_id: payload.driver_id,
        vehicle_id: payload.vehicle_id,
        category: payload.category,
        description: payload.description,
        amount: round2(payload.amount),
        status: ExpenseStatus::Pending,
        charged_to: payload.charged_to,
        expense_date,
        payment_id: None,
        created_at: now,
        updated_at: now,
    };

    tracing::info!(
        expense_id = %expense.id,
        vendor_id = %vendor.vendor_id,
        category = expense.category.as_str(),
        charged_to = expense.charged_to.as_str(),
        amount = expense.amount,
        "Creating expense"
    );

    state.repository.insert_expense(&expense).await?;

    Ok((StatusCode::CREATED, Json(ExpenseResponse::from(expense))))
}

/// Approve or reject a pending expense. `paid` is reserved for the payment
/// flow and a paid expense never changes again.
pub async fn update_expense_status(
    State(state): State<AppState>,
    vendor: VendorContext,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<UpdateExpenseStatusRequest>,
) -> Result<Json<ExpenseResponse>, AppError> {
    if payload.status == ExpenseStatus::Paid {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Expenses are marked paid by recording a payment against them"
        )));
    }

    let expense = state
        .repository
        .get_expense(&vendor.vendor_id, expense_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Expense not found")))?;

    if expense.status == ExpenseStatus::Paid {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Paid expenses cannot change status"
        )));
    }

    state
        .repository
        .set_expense_status(&vendor.vendor_id, expense_id, payload.status)
        .await?;

    let updated = state
        .repository
        .get_expense(&vendor.vendor_id, expense_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Expense not found")))?;

    Ok(Json(ExpenseResponse::from(updated)))
}
