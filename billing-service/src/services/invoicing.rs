//! Invoice generation.
//!
//! Selects uncategorized transaction records for a counterparty over a date
//! range, bundles them into an invoice with snapshot line items, assigns a
//! sequential invoice number, and (society side only) flags the source
//! deliveries as invoiced.

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use mongodb::bson::DateTime as BsonDateTime;
use uuid::Uuid;

use service_core::error::AppError;

use crate::dtos::{parse_date, GenerateInvoiceRequest};
use crate::models::{
    round2, Collection, Delivery, Invoice, InvoiceItem, InvoiceStatus, InvoiceType, RelatedParty,
};
use crate::services::BillingStore;

/// Human-readable number: `{PREFIX}-{YYYY}{MM}-{seq:04}`.
pub fn format_invoice_number(invoice_type: InvoiceType, year: i32, month: u32, seq: i64) -> String {
    format!(
        "{}-{:04}{:02}-{:04}",
        invoice_type.number_prefix(),
        year,
        month,
        seq
    )
}

/// Timestamp-derived fallback. Numbering must never block invoice creation,
/// so a counter failure degrades to this instead of failing the operation.
pub fn fallback_invoice_number(
    invoice_type: InvoiceType,
    now: chrono::DateTime<Utc>,
) -> String {
    format!("{}-{}", invoice_type.number_prefix(), now.timestamp_millis())
}

/// Validate and parse the requested period. Both bounds are required and the
/// start must not come after the end.
pub fn validate_period(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = parse_date("start_date", start)?;
    let end = parse_date("end_date", end)?;
    if start > end {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "start_date must not be after end_date"
        )));
    }
    Ok((start, end))
}

/// Inclusive BSON datetime window covering the whole days of the period.
pub fn period_window(start: NaiveDate, end: NaiveDate) -> (BsonDateTime, BsonDateTime) {
    let start_dt = Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap());
    let end_dt = Utc.from_utc_datetime(&end.and_hms_milli_opt(23, 59, 59, 999).unwrap());
    (
        BsonDateTime::from_chrono(start_dt),
        BsonDateTime::from_chrono(end_dt),
    )
}

/// Snapshot deliveries into line items. Returns the items and their subtotal.
pub fn delivery_line_items(records: &[Delivery]) -> (Vec<InvoiceItem>, f64) {
    let items: Vec<InvoiceItem> = records
        .iter()
        .map(|r| InvoiceItem {
            source_record_id: r.id,
            date: r.created_at,
            driver_name: r.driver_name.clone(),
            vehicle_number: r.vehicle_number.clone(),
            quantity: r.quantity,
            rate: r.rate,
            amount: round2(r.quantity * r.rate),
        })
        .collect();
    let subtotal = round2(items.iter().map(|i| i.amount).sum());
    (items, subtotal)
}

/// Snapshot collections into line items.
pub fn collection_line_items(records: &[Collection]) -> (Vec<InvoiceItem>, f64) {
    let items: Vec<InvoiceItem> = records
        .iter()
        .map(|r| InvoiceItem {
            source_record_id: r.id,
            date: r.created_at,
            driver_name: r.driver_name.clone(),
            vehicle_number: r.vehicle_number.clone(),
            quantity: r.quantity,
            rate: r.rate,
            amount: round2(r.quantity * r.rate),
        })
        .collect();
    let subtotal = round2(items.iter().map(|i| i.amount).sum());
    (items, subtotal)
}

/// Counterparty kind decides the invoice type: supplier invoices bill
/// collections (purchases), society invoices bill deliveries.
pub fn invoice_type_for(related_to: RelatedParty) -> InvoiceType {
    match related_to {
        RelatedParty::Supplier => InvoiceType::Purchase,
        RelatedParty::Society => InvoiceType::Delivery,
    }
}

async fn next_invoice_number(
    repo: &impl BillingStore,
    vendor_id: &str,
    invoice_type: InvoiceType,
) -> String {
    let now = Utc::now();
    let period = format!("{:04}{:02}", now.year(), now.month());
    match repo
        .next_invoice_sequence(vendor_id, invoice_type.as_str(), &period)
        .await
    {
        Ok(seq) => format_invoice_number(invoice_type, now.year(), now.month(), seq),
        Err(e) => {
            tracing::warn!(
                vendor_id = %vendor_id,
                error = %e,
                "Invoice counter failed, falling back to timestamp number"
            );
            fallback_invoice_number(invoice_type, now)
        }
    }
}

/// Generate an invoice for the counterparty over the period.
///
/// Society side: completed, un-invoiced deliveries; the selected deliveries
/// are flagged afterwards, and if that flagging fails the invoice is deleted
/// again. Supplier side: completed collections with no invoiced gating.
pub async fn generate_invoice(
    repo: &impl BillingStore,
    vendor_id: &str,
    req: &GenerateInvoiceRequest,
) -> Result<Invoice, AppError> {
    let (start, end) = validate_period(&req.start_date, &req.end_date)?;
    let (window_start, window_end) = period_window(start, end);

    let invoice_type = invoice_type_for(req.related_to);

    let (items, subtotal, delivery_ids) = match req.related_to {
        RelatedParty::Society => {
            let records = repo
                .find_billable_deliveries(vendor_id, &req.related_id, window_start, window_end)
                .await?;
            if records.is_empty() {
                return Err(AppError::NotFound(anyhow::anyhow!(
                    "No billable deliveries found for the period"
                )));
            }
            let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
            let (items, subtotal) = delivery_line_items(&records);
            (items, subtotal, Some(ids))
        }
        RelatedParty::Supplier => {
            let records = repo
                .find_completed_collections_in_range(
                    vendor_id,
                    &req.related_id,
                    window_start,
                    window_end,
                )
                .await?;
            if records.is_empty() {
                return Err(AppError::NotFound(anyhow::anyhow!(
                    "No billable collections found for the period"
                )));
            }
            let (items, subtotal) = collection_line_items(&records);
            (items, subtotal, None)
        }
    };

    let invoice_number = next_invoice_number(repo, vendor_id, invoice_type).await;
    let now = BsonDateTime::now();

    let invoice = Invoice {
        id: Uuid::new_v4(),
        vendor_id: vendor_id.to_string(),
        invoice_number,
        invoice_type,
        related_to: req.related_to,
        related_id: req.related_id.clone(),
        period_start: Some(start),
        period_end: Some(end),
        items,
        subtotal,
        tax: 0.0,
        discount: 0.0,
        // No tax or discount at generation time; edited later if at all.
        total: Invoice::compute_total(subtotal, 0.0, 0.0),
        status: InvoiceStatus::Draft,
        due_date: None,
        paid_date: None,
        payments: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    repo.insert_invoice(&invoice).await?;

    if let Some(ids) = delivery_ids {
        if let Err(e) = repo
            .mark_deliveries_invoiced(vendor_id, &ids, invoice.id)
            .await
        {
            // Flagging failed; the invoice must not survive half-applied.
            tracing::error!(
                invoice_id = %invoice.id,
                error = %e,
                "Failed to flag deliveries, deleting invoice"
            );
            // The flagging error is the one the caller needs; a failed
            // cleanup is logged, not substituted for it.
            if let Err(cleanup) = repo.delete_invoice(vendor_id, invoice.id).await {
                tracing::error!(
                    invoice_id = %invoice.id,
                    error = %cleanup,
                    "Compensating invoice delete failed"
                );
            }
            return Err(e);
        }
    }

    tracing::info!(
        invoice_id = %invoice.id,
        invoice_number = %invoice.invoice_number,
        vendor_id = %vendor_id,
        related_to = req.related_to.as_str(),
        items = invoice.items.len(),
        total = invoice.total,
        "Invoice generated"
    );
    metrics::counter!("invoices_generated_total").increment(1);

    Ok(invoice)
}

/// Explicit draft → sent transition.
pub async fn send_invoice(
    repo: &impl BillingStore,
    vendor_id: &str,
    invoice_id: Uuid,
) -> Result<Invoice, AppError> {
    let invoice = repo
        .get_invoice(vendor_id, invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

    if invoice.status != InvoiceStatus::Draft {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Only draft invoices can be sent (current status: {})",
            invoice.status.as_str()
        )));
    }

    repo.set_invoice_status(vendor_id, invoice_id, InvoiceStatus::Sent)
        .await?;

    repo.get_invoice(vendor_id, invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))
}
