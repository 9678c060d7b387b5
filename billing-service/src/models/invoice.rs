//! Invoice model. Items are embedded by value: an invoice is a financial
//! snapshot of its source records at generation time.

use chrono::NaiveDate;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    Purchase,
    Delivery,
    Monthly,
}

impl InvoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceType::Purchase => "purchase",
            InvoiceType::Delivery => "delivery",
            InvoiceType::Monthly => "monthly",
        }
    }

    /// Prefix used in human-readable invoice numbers.
    pub fn number_prefix(&self) -> &'static str {
        match self {
            InvoiceType::Purchase => "PUR",
            InvoiceType::Delivery => "DEL",
            InvoiceType::Monthly => "MON",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

/// Which side of the business an invoice (or payment) relates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedParty {
    Supplier,
    Society,
}

impl RelatedParty {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelatedParty::Supplier => "supplier",
            RelatedParty::Society => "society",
        }
    }
}

/// A point-in-time snapshot of one source record. Snapshot fields must not
/// change even if the source record is later edited.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InvoiceItem {
    pub source_record_id: Uuid,
    pub date: DateTime,
    pub driver_name: String,
    pub vehicle_number: String,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub vendor_id: String,
    pub invoice_number: String,
    pub invoice_type: InvoiceType,
    pub related_to: RelatedParty,
    pub related_id: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub items: Vec<InvoiceItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub discount: f64,
    /// Fixed at creation from the items; payments never mutate it.
    pub total: f64,
    pub status: InvoiceStatus,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<DateTime>,
    pub payments: Vec<Uuid>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Invoice {
    /// total = subtotal + tax - discount, two-decimal rounded.
    pub fn compute_total(subtotal: f64, tax: f64, discount: f64) -> f64 {
        round2(subtotal + tax - discount)
    }
}
