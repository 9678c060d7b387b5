pub mod invoicing;
pub mod metrics;
pub mod outstanding;
pub mod payments;
pub mod repository;
pub mod salary;

pub use metrics::{get_metrics, init_metrics};
pub use repository::{BillingRepository, BillingStore};
