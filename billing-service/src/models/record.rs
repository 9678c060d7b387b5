//! Transaction records: deliveries (society side) and collections (supplier side).
//!
//! Both are facts created by a driver action. `total_amount` is always derived
//! from `quantity` and `rate` before persistence, never stored independently.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Round a monetary figure to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Pending,
    Completed,
    Cancelled,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Completed => "completed",
            RecordStatus::Cancelled => "cancelled",
        }
    }
}

/// A water delivery made to a society.
///
/// Carries denormalized driver/vehicle names so invoice line items can
/// snapshot them without reaching into externally-owned stores.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Delivery {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub vendor_id: String,
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
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Delivery {
    /// Recompute the derived amount. Must run on every save that touches
    /// quantity or rate.
    pub fn recompute_total(&mut self) {
        self.total_amount = round2(self.quantity * self.rate);
    }

    /// A record is editable only while pending; once completed it is frozen
    /// except for the invoicing flags.
    pub fn is_editable(&self) -> bool {
        self.status == RecordStatus::Pending
    }
}

/// A water collection from a supplier. Mirrors `Delivery` minus the
/// invoicing flags: collections carry no `is_invoiced` gate.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Collection {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub vendor_id: String,
    pub supplier_id: String,
    pub vehicle_id: String,
    pub vehicle_number: String,
    pub driver_id: String,
    pub driver_name: String,
    pub quantity: f64,
    pub rate: f64,
    pub total_amount: f64,
    pub status: RecordStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Collection {
    pub fn recompute_total(&mut self) {
        self.total_amount = round2(self.quantity * self.rate);
    }

    pub fn is_editable(&self) -> bool {
        self.status == RecordStatus::Pending
    }
}
