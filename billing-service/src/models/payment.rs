//! Payment model. A recorded payment is treated as immediately settled:
//! it is created `completed`, and only completed payments count toward
//! paid/outstanding aggregates.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Purchase,
    Delivery,
    Expense,
    Other,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Purchase => "purchase",
            PaymentType::Delivery => "delivery",
            PaymentType::Expense => "expense",
            PaymentType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

/// Counterparty kind a payment settles against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentParty {
    Supplier,
    Society,
    Driver,
    Vendor,
}

impl PaymentParty {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentParty::Supplier => "supplier",
            PaymentParty::Society => "society",
            PaymentParty::Driver => "driver",
            PaymentParty::Vendor => "vendor",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub vendor_id: String,
    pub payment_type: PaymentType,
    pub related_to: PaymentParty,
    pub related_id: String,
    pub invoice_id: Option<Uuid>,
    pub collection_id: Option<Uuid>,
    pub expense_id: Option<Uuid>,
    pub amount: f64,
    pub payment_method: String,
    pub payment_date: DateTime,
    pub status: PaymentStatus,
    pub reference_number: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Sum of the completed payment amounts in a set.
pub fn completed_total(payments: &[Payment]) -> f64 {
    super::record::round2(
        payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .map(|p| p.amount)
            .sum(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(amount: f64, status: PaymentStatus) -> Payment {
        let now = DateTime::now();
        Payment {
            id: Uuid::new_v4(),
            vendor_id: "vendor-1".into(),
            payment_type: PaymentType::Delivery,
            related_to: PaymentParty::Society,
            related_id: "society-1".into(),
            invoice_id: None,
            collection_id: None,
            expense_id: None,
            amount,
            payment_method: "upi".into(),
            payment_date: now,
            status,
            reference_number: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn only_completed_payments_count() {
        let payments = vec![
            payment(400.0, PaymentStatus::Completed),
            payment(600.0, PaymentStatus::Pending),
            payment(100.0, PaymentStatus::Failed),
            payment(50.0, PaymentStatus::Completed),
        ];
        assert_eq!(completed_total(&payments), 450.0);
    }
}
