//! Expense model. Fuel is always vendor-borne: the policy is enforced at
//! assignment time, in every path that sets `charged_to`.

use chrono::NaiveDate;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Fuel,
    Maintenance,
    Toll,
    Food,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Fuel => "fuel",
            ExpenseCategory::Maintenance => "maintenance",
            ExpenseCategory::Toll => "toll",
            ExpenseCategory::Food => "food",
            ExpenseCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Approved => "approved",
            ExpenseStatus::Rejected => "rejected",
            ExpenseStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargedTo {
    Vendor,
    Driver,
}

impl ChargedTo {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargedTo::Vendor => "vendor",
            ChargedTo::Driver => "driver",
        }
    }
}

/// Fuel must never be charged to a driver. Returns an error message suitable
/// for a 400 response when the combination is invalid.
pub fn validate_charge_policy(
    category: ExpenseCategory,
    charged_to: ChargedTo,
) -> Result<(), &'static str> {
    if category == ExpenseCategory::Fuel && charged_to == ChargedTo::Driver {
        return Err("fuel expenses are always charged to the vendor");
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Expense {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub vendor_id: String,
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub amount: f64,
    pub status: ExpenseStatus,
    pub charged_to: ChargedTo,
    pub expense_date: NaiveDate,
    pub payment_id: Option<Uuid>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Expense {
    /// Whether this expense deducts from a driver's salary for the month:
    /// approved, driver-charged, and not fuel.
    pub fn is_driver_deductible(&self) -> bool {
        self.status == ExpenseStatus::Approved
            && self.charged_to == ChargedTo::Driver
            && self.category != ExpenseCategory::Fuel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuel_cannot_be_charged_to_driver() {
        assert!(validate_charge_policy(ExpenseCategory::Fuel, ChargedTo::Driver).is_err());
        assert!(validate_charge_policy(ExpenseCategory::Fuel, ChargedTo::Vendor).is_ok());
        assert!(validate_charge_policy(ExpenseCategory::Toll, ChargedTo::Driver).is_ok());
    }

    #[test]
    fn deductible_requires_approved_driver_charged_non_fuel() {
        let now = DateTime::now();
        let mut expense = Expense {
            id: Uuid::new_v4(),
            vendor_id: "vendor-1".into(),
            driver_id: Some("driver-1".into()),
            vehicle_id: None,
            category: ExpenseCategory::Toll,
            description: None,
            amount: 250.0,
            status: ExpenseStatus::Approved,
            charged_to: ChargedTo::Driver,
            expense_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            payment_id: None,
            created_at: now,
            updated_at: now,
        };
        assert!(expense.is_driver_deductible());

        expense.status = ExpenseStatus::Pending;
        assert!(!expense.is_driver_deductible());

        expense.status = ExpenseStatus::Approved;
        expense.charged_to = ChargedTo::Vendor;
        assert!(!expense.is_driver_deductible());
    }
}
