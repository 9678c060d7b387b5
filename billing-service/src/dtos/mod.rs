//! Request and response shapes for the HTTP API.
//!
//! Dates arrive as `YYYY-MM-DD` strings and are parsed explicitly so a
//! malformed date surfaces as a 400 with a useful message instead of a
//! serde rejection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use service_core::error::AppError;

use crate::models::{
    AttendanceStatus, ChargedTo, Collection, Delivery, DriverAttendance, Expense, ExpenseCategory,
    ExpenseStatus, Invoice, InvoiceItem, InvoiceStatus, InvoiceType, Payment, PaymentParty,
    PaymentStatus, PaymentType, RecordStatus, RelatedParty,
};

/// Parse a `YYYY-MM-DD` field, naming it in the error.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("{} must be a YYYY-MM-DD date", field)))
}

// ---------------------------------------------------------------------------
// Transaction records
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeliveryRequest {
    #[validate(length(min = 1, message = "society_id is required"))]
    pub society_id: String,
    #[validate(length(min = 1, message = "vehicle_id is required"))]
    pub vehicle_id: String,
    #[validate(length(min = 1, message = "vehicle_number is required"))]
    pub vehicle_number: String,
    #[validate(length(min = 1, message = "driver_id is required"))]
    pub driver_id: String,
    #[validate(length(min = 1, message = "driver_name is required"))]
    pub driver_name: String,
    #[validate(range(min = 0.0, message = "quantity must not be negative"))]
    pub quantity: f64,
    #[validate(range(min = 0.0, message = "rate must not be negative"))]
    pub rate: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCollectionRequest {
    #[validate(length(min = 1, message = "supplier_id is required"))]
    pub supplier_id: String,
    #[validate(length(min = 1, message = "vehicle_id is required"))]
    pub vehicle_id: String,
    #[validate(length(min = 1, message = "vehicle_number is required"))]
    pub vehicle_number: String,
    #[validate(length(min = 1, message = "driver_id is required"))]
    pub driver_id: String,
    #[validate(length(min = 1, message = "driver_name is required"))]
    pub driver_name: String,
    #[validate(range(min = 0.0, message = "quantity must not be negative"))]
    pub quantity: f64,
    #[validate(range(min = 0.0, message = "rate must not be negative"))]
    pub rate: f64,
}

/// Edit of a pending record. Quantity/rate edits trigger an amount recompute;
/// a status change to `completed` freezes the record.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRecordRequest {
    #[validate(range(min = 0.0, message = "quantity must not be negative"))]
    pub quantity: Option<f64>,
    #[validate(range(min = 0.0, message = "rate must not be negative"))]
    pub rate: Option<f64>,
    pub status: Option<RecordStatus>,
}

#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub id: Uuid,
    pub society_id: String,
    pub vehicle_id: String,
    pub vehicle_number: String,
    pub driver_id: String,
    pub driver_name: String,
    pub quantity: f64,
    pub rate: f64,
    pub total_amount: f64,
    pub status: RecordStatus,
    pub is_invoiced: bool,
    pub invoice_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Delivery> for DeliveryResponse {
    fn from(d: Delivery) -> Self {
        Self {
            id: d.id,
            society_id: d.society_id,
            vehicle_id: d.vehicle_id,
            vehicle_number: d.vehicle_number,
            driver_id: d.driver_id,
            driver_name: d.driver_name,
            quantity: d.quantity,
            rate: d.rate,
            total_amount: d.total_amount,
            status: d.status,
            is_invoiced: d.is_invoiced,
            invoice_id: d.invoice_id,
            created_at: d.created_at.to_chrono(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    pub id: Uuid,
    pub supplier_id: String,
    pub vehicle_id: String,
    pub vehicle_number: String,
    pub driver_id: String,
    pub driver_name: String,
    pub quantity: f64,
    pub rate: f64,
    pub total_amount: f64,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Collection> for CollectionResponse {
    fn from(c: Collection) -> Self {
        Self {
            id: c.id,
            supplier_id: c.supplier_id,
            vehicle_id: c.vehicle_id,
            vehicle_number: c.vehicle_number,
            driver_id: c.driver_id,
            driver_name: c.driver_name,
            quantity: c.quantity,
            rate: c.rate,
            total_amount: c.total_amount,
            status: c.status,
            created_at: c.created_at.to_chrono(),
        }
    }
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateInvoiceRequest {
    #[validate(length(min = 1, message = "related_id is required"))]
    pub related_id: String,
    pub related_to: RelatedParty,
    #[validate(length(min = 1, message = "start_date is required"))]
    pub start_date: String,
    #[validate(length(min = 1, message = "end_date is required"))]
    pub end_date: String,
}

#[derive(Debug, Serialize)]
pub struct InvoiceItemResponse {
    pub source_record_id: Uuid,
    pub date: DateTime<Utc>,
    pub driver_name: String,
    pub vehicle_number: String,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

impl From<InvoiceItem> for InvoiceItemResponse {
    fn from(item: InvoiceItem) -> Self {
        Self {
            source_record_id: item.source_record_id,
            date: item.date.to_chrono(),
            driver_name: item.driver_name,
            vehicle_number: item.vehicle_number,
            quantity: item.quantity,
            rate: item.rate,
            amount: item.amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub invoice_number: String,
    pub invoice_type: InvoiceType,
    pub related_to: RelatedParty,
    pub related_id: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub items: Vec<InvoiceItemResponse>,
    pub subtotal: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
    pub status: InvoiceStatus,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<DateTime<Utc>>,
    pub payments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(inv: Invoice) -> Self {
        Self {
            id: inv.id,
            invoice_number: inv.invoice_number,
            invoice_type: inv.invoice_type,
            related_to: inv.related_to,
            related_id: inv.related_id,
            period_start: inv.period_start,
            period_end: inv.period_end,
            items: inv.items.into_iter().map(Into::into).collect(),
            subtotal: inv.subtotal,
            tax: inv.tax,
            discount: inv.discount,
            total: inv.total,
            status: inv.status,
            due_date: inv.due_date,
            paid_date: inv.paid_date.map(|d| d.to_chrono()),
            payments: inv.payments,
            created_at: inv.created_at.to_chrono(),
        }
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub related_to: PaymentParty,
    #[validate(length(min = 1, message = "related_id is required"))]
    pub related_id: String,
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: f64,
    pub invoice_id: Option<Uuid>,
    pub collection_id: Option<Uuid>,
    pub expense_id: Option<Uuid>,
    #[validate(length(min = 1, message = "payment_method is required"))]
    pub payment_method: String,
    #[validate(length(min = 1, message = "payment_date is required"))]
    pub payment_date: String,
    pub reference_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub related_to: PaymentParty,
    pub related_id: String,
    pub invoice_id: Option<Uuid>,
    pub collection_id: Option<Uuid>,
    pub expense_id: Option<Uuid>,
    pub amount: f64,
    pub payment_method: String,
    pub payment_date: DateTime<Utc>,
    pub status: PaymentStatus,
    pub reference_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            payment_type: p.payment_type,
            related_to: p.related_to,
            related_id: p.related_id,
            invoice_id: p.invoice_id,
            collection_id: p.collection_id,
            expense_id: p.expense_id,
            amount: p.amount,
            payment_method: p.payment_method,
            payment_date: p.payment_date.to_chrono(),
            status: p.status,
            reference_number: p.reference_number,
            created_at: p.created_at.to_chrono(),
        }
    }
}

// ---------------------------------------------------------------------------
// Outstanding
// ---------------------------------------------------------------------------

/// Supplier side: no invoice gating; outstanding is raw and signed, so an
/// overpaid supplier shows a negative figure.
#[derive(Debug, Serialize)]
pub struct SupplierOutstandingResponse {
    pub supplier_id: String,
    pub total_collections: f64,
    pub total_paid: f64,
    pub outstanding: f64,
    pub unpaid_collections: Vec<CollectionResponse>,
}

#[derive(Debug, Serialize)]
pub struct OutstandingInvoiceResponse {
    pub id: Uuid,
    pub invoice_number: String,
    pub status: InvoiceStatus,
    pub total: f64,
    pub paid: f64,
    pub outstanding: f64,
    pub created_at: DateTime<Utc>,
}

/// Society side: outstanding on sent/overdue invoices, with not-yet-billed
/// deliveries reported as a separate bucket.
#[derive(Debug, Serialize)]
pub struct SocietyOutstandingResponse {
    pub society_id: String,
    pub outstanding_invoices: Vec<OutstandingInvoiceResponse>,
    pub total_invoiced: f64,
    pub total_paid: f64,
    pub total_outstanding: f64,
    pub unbilled_deliveries: Vec<DeliveryResponse>,
    pub unbilled_amount: f64,
}

// ---------------------------------------------------------------------------
// Attendance & salary
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct MarkAttendanceRequest {
    #[validate(length(min = 1, message = "date is required"))]
    pub date: String,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub id: Uuid,
    pub driver_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

impl From<DriverAttendance> for AttendanceResponse {
    fn from(a: DriverAttendance) -> Self {
        Self {
            id: a.id,
            driver_id: a.driver_id,
            date: a.date,
            status: a.status,
            note: a.note,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SalaryQuery {
    pub month: String,
}

#[derive(Debug, Serialize)]
pub struct AttendanceSummaryResponse {
    pub present_days: u32,
    pub half_days: u32,
    pub absent_days: u32,
    pub attendance_units: f64,
}

#[derive(Debug, Serialize)]
pub struct SalaryResponse {
    pub driver_id: String,
    pub month: String,
    pub attendance: AttendanceSummaryResponse,
    pub daily_wage: f64,
    pub gross_pay: f64,
    pub driver_expenses: f64,
    pub net_pay: f64,
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: f64,
    pub charged_to: ChargedTo,
    #[validate(length(min = 1, message = "expense_date is required"))]
    pub expense_date: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExpenseStatusRequest {
    pub status: ExpenseStatus,
}

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub amount: f64,
    pub status: ExpenseStatus,
    pub charged_to: ChargedTo,
    pub expense_date: NaiveDate,
    pub payment_id: Option<Uuid>,
}

impl From<Expense> for ExpenseResponse {
    fn from(e: Expense) -> Self {
        Self {
            id: e.id,
            driver_id: e.driver_id,
            vehicle_id: e.vehicle_id,
            category: e.category,
            description: e.description,
            amount: e.amount,
            status: e.status,
            charged_to: e.charged_to,
            expense_date: e.expense_date,
            payment_id: e.payment_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_days() {
        assert_eq!(
            parse_date("start_date", "2026-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("start_date", "03/01/2026").is_err());
        assert!(parse_date("start_date", "").is_err());
    }
}
