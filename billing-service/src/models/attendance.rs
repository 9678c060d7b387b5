//! Driver attendance ledger. At most one record per (vendor, driver, date);
//! marking the same day twice overwrites the prior status.

use chrono::NaiveDate;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Half,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Half => "half",
            AttendanceStatus::Absent => "absent",
        }
    }

    /// Weight toward payable attendance units. Half days weigh exactly half.
    pub fn units(&self) -> f64 {
        match self {
            AttendanceStatus::Present => 1.0,
            AttendanceStatus::Half => 0.5,
            AttendanceStatus::Absent => 0.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DriverAttendance {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub vendor_id: String,
    pub driver_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}
