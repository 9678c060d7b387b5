//! Driver record, read-only from this service's point of view. Driver CRUD
//! lives with the back-office entity management; salary calculation only
//! needs the daily wage.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Driver {
    #[serde(rename = "_id")]
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub daily_wage: f64,
    pub is_active: bool,
}
