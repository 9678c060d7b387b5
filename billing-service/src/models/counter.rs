//! Invoice-number counter document. One per (vendor, invoice type, YYYYMM),
//! bumped with an atomic `$inc` so concurrent generations never share a
//! sequence number.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InvoiceCounter {
    #[serde(rename = "_id")]
    pub id: String,
    pub vendor_id: String,
    pub invoice_type: String,
    pub period: String,
    pub seq: i64,
}

impl InvoiceCounter {
    /// Key format: `{vendor}:{type}:{YYYYMM}`.
    pub fn key(vendor_id: &str, invoice_type: &str, period: &str) -> String {
        format!("{}:{}:{}", vendor_id, invoice_type, period)
    }
}
