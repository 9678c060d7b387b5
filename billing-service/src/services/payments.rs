//! Payment recording.
//!
//! A recorded payment is created `completed` and immediately counts toward
//! the invoice's cumulative paid figure. Overpayment is accepted silently;
//! no rule requires `amount <= outstanding`.

use chrono::{TimeZone, Utc};
use mongodb::bson::DateTime as BsonDateTime;
use uuid::Uuid;

use service_core::error::AppError;

use crate::dtos::{parse_date, RecordPaymentRequest};
use crate::models::{payment::completed_total, round2, Payment, PaymentStatus};
use crate::services::BillingStore;

/// Whether cumulative completed payments cover the invoice total.
pub fn covers_total(cumulative_paid: f64, invoice_total: f64) -> bool {
    round2(cumulative_paid) >= round2(invoice_total)
}

/// Record a payment, apply it to its invoice or expense if one is linked.
pub async fn record_payment(
    repo: &impl BillingStore,
    vendor_id: &str,
    req: &RecordPaymentRequest,
) -> Result<Payment, AppError> {
    let payment_date = parse_date("payment_date", &req.payment_date)?;

    // Referenced entities must exist before the payment is written.
    let invoice = match req.invoice_id {
        Some(invoice_id) => Some(
            repo.get_invoice(vendor_id, invoice_id)
                .await?
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?,
        ),
        None => None,
    };
    if let Some(expense_id) = req.expense_id {
        repo.get_expense(vendor_id, expense_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Expense not found")))?;
    }

    let now = BsonDateTime::now();
    let payment = Payment {
        id: Uuid::new_v4(),
        vendor_id: vendor_id.to_string(),
        payment_type: req.payment_type,
        related_to: req.related_to,
        related_id: req.related_id.clone(),
        invoice_id: req.invoice_id,
        collection_id: req.collection_id,
        expense_id: req.expense_id,
        amount: round2(req.amount),
        payment_method: req.payment_method.clone(),
        payment_date: BsonDateTime::from_chrono(
            Utc.from_utc_datetime(&payment_date.and_hms_opt(0, 0, 0).unwrap()),
        ),
        status: PaymentStatus::Completed,
        reference_number: req.reference_number.clone(),
        created_at: now,
        updated_at: now,
    };

    repo.insert_payment(&payment).await?;

    if let Some(invoice) = invoice {
        repo.push_payment_to_invoice(vendor_id, invoice.id, payment.id)
            .await?;

        // Cumulative paid is recomputed from the store, not accumulated.
        let completed = repo
            .find_completed_payments_for_invoice(vendor_id, invoice.id)
            .await?;
        let cumulative = completed_total(&completed);

        if covers_total(cumulative, invoice.total) {
            repo.mark_invoice_paid(vendor_id, invoice.id, BsonDateTime::now())
                .await?;
            tracing::info!(
                invoice_id = %invoice.id,
                cumulative_paid = cumulative,
                total = invoice.total,
                "Invoice fully paid"
            );
        }
    }

    if let Some(expense_id) = req.expense_id {
        // Terminal transition; there is no un-paying an expense.
        repo.mark_expense_paid(vendor_id, expense_id, payment.id)
            .await?;
    }

    tracing::info!(
        payment_id = %payment.id,
        vendor_id = %vendor_id,
        amount = payment.amount,
        payment_type = payment.payment_type.as_str(),
        "Payment recorded"
    );
    metrics::counter!("payments_recorded_total").increment(1);

    Ok(payment)
}
