//! Outstanding / reconciliation aggregation.
//!
//! Figures are recomputed from the raw records on every call. Outstanding is
//! returned raw and signed: an overpaid counterparty shows a negative figure,
//! and no layer of this service clamps it.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use service_core::error::AppError;

use crate::models::{round2, Collection, Delivery, Invoice, Payment};
use crate::services::BillingStore;

#[derive(Debug)]
pub struct SupplierOutstanding {
    pub total_collections: f64,
    pub total_paid: f64,
    pub outstanding: f64,
    pub unpaid_collections: Vec<Collection>,
}

/// Supplier side has no invoice gating: every completed collection counts,
/// and "unpaid" is a set difference against payments' `collection_id` links
/// because collections carry no paid flag.
pub fn summarize_supplier(
    collections: Vec<Collection>,
    payments: &[Payment],
) -> SupplierOutstanding {
    let total_collections = round2(collections.iter().map(|c| c.total_amount).sum());
    let total_paid = round2(payments.iter().map(|p| p.amount).sum());

    let paid_collection_ids: HashSet<Uuid> =
        payments.iter().filter_map(|p| p.collection_id).collect();

    // Input is already newest-first from the repository.
    let unpaid_collections: Vec<Collection> = collections
        .into_iter()
        .filter(|c| !paid_collection_ids.contains(&c.id))
        .collect();

    SupplierOutstanding {
        total_collections,
        total_paid,
        outstanding: round2(total_collections - total_paid),
        unpaid_collections,
    }
}

#[derive(Debug)]
pub struct SocietyOutstanding {
    /// Open (sent/overdue) invoices with their cumulative paid figures.
    pub invoices: Vec<(Invoice, f64)>,
    pub total_invoiced: f64,
    pub total_paid: f64,
    pub total_outstanding: f64,
    /// Completed deliveries not yet on any invoice: not billed at all, so a
    /// separate bucket from the invoice outstanding.
    pub unbilled_deliveries: Vec<Delivery>,
    pub unbilled_amount: f64,
}

pub fn summarize_society(
    invoices: Vec<Invoice>,
    payments: &[Payment],
    unbilled_deliveries: Vec<Delivery>,
) -> SocietyOutstanding {
    let mut paid_by_invoice: HashMap<Uuid, f64> = HashMap::new();
    for payment in payments {
        if let Some(invoice_id) = payment.invoice_id {
            *paid_by_invoice.entry(invoice_id).or_insert(0.0) += payment.amount;
        }
    }

    let total_invoiced = round2(invoices.iter().map(|i| i.total).sum());
    let invoices: Vec<(Invoice, f64)> = invoices
        .into_iter()
        .map(|inv| {
            let paid = round2(paid_by_invoice.get(&inv.id).copied().unwrap_or(0.0));
            (inv, paid)
        })
        .collect();
    let total_paid = round2(invoices.iter().map(|(_, paid)| paid).sum());
    let unbilled_amount = round2(unbilled_deliveries.iter().map(|d| d.total_amount).sum());

    SocietyOutstanding {
        total_invoiced,
        total_paid,
        total_outstanding: round2(total_invoiced - total_paid),
        invoices,
        unbilled_deliveries,
        unbilled_amount,
    }
}

pub async fn supplier_outstanding(
    repo: &impl BillingStore,
    vendor_id: &str,
    supplier_id: &str,
) -> Result<SupplierOutstanding, AppError> {
    let collections = repo
        .find_completed_collections(vendor_id, supplier_id)
        .await?;
    let payments = repo
        .find_completed_supplier_payments(vendor_id, supplier_id)
        .await?;
    Ok(summarize_supplier(collections, &payments))
}

pub async fn society_outstanding(
    repo: &impl BillingStore,
    vendor_id: &str,
    society_id: &str,
) -> Result<SocietyOutstanding, AppError> {
    let invoices = repo
        .find_open_invoices_for_society(vendor_id, society_id)
        .await?;
    let invoice_ids: Vec<Uuid> = invoices.iter().map(|i| i.id).collect();
    let payments = if invoice_ids.is_empty() {
        Vec::new()
    } else {
        repo.find_completed_payments_for_invoices(vendor_id, &invoice_ids)
            .await?
    };
    let unbilled = repo.find_unbilled_deliveries(vendor_id, society_id).await?;
    Ok(summarize_society(invoices, &payments, unbilled))
}
