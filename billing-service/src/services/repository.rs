//! MongoDB repository for the billing subsystem.
//!
//! Every query is scoped by `vendor_id`. Aggregate figures are recomputed
//! from scratch on each call; there is no cached or materialized balance.
//!
//! The operations the service layer depends on are behind [`BillingStore`],
//! so invoice generation, payment application and the salary flow can run
//! against an in-memory store in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::bson::{doc, to_bson, Bson, DateTime as BsonDateTime, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection as MongoCollection, Database, IndexModel};
use uuid::Uuid;

use service_core::error::AppError;

use crate::models::{
    AttendanceStatus, Collection, Delivery, Driver, DriverAttendance, Expense, ExpenseStatus,
    Invoice, InvoiceCounter, InvoiceStatus, Payment,
};

/// Filter for deliveries eligible to appear on a society invoice: completed,
/// never invoiced, optionally bounded to a creation window.
pub fn billable_delivery_filter(
    vendor_id: &str,
    society_id: &str,
    window: Option<(BsonDateTime, BsonDateTime)>,
) -> Document {
    let mut filter = doc! {
        "vendor_id": vendor_id,
        "society_id": society_id,
        "status": "completed",
        "is_invoiced": false,
    };
    if let Some((start, end)) = window {
        filter.insert("created_at", doc! { "$gte": start, "$lte": end });
    }
    filter
}

/// Key filter for one driver-day attendance document.
pub fn attendance_key_filter(vendor_id: &str, driver_id: &str, date: NaiveDate) -> Document {
    doc! {
        "vendor_id": vendor_id,
        "driver_id": driver_id,
        "date": date.format("%Y-%m-%d").to_string(),
    }
}

/// Update document for an attendance mark. `$set` carries only the mutable
/// mark fields; identity lives in `$setOnInsert` (and the key filter), so
/// re-marking a day overwrites the status instead of minting a new document.
pub fn attendance_mark_update(
    status: AttendanceStatus,
    note: Option<&str>,
) -> Result<Document, AppError> {
    Ok(doc! {
        "$set": {
            "status": to_bson(&status).map_err(|e| AppError::InternalError(e.into()))?,
            "note": note,
            "updated_at": BsonDateTime::now(),
        },
        "$setOnInsert": {
            "_id": Uuid::new_v4().to_string(),
            "created_at": BsonDateTime::now(),
        }
    })
}

/// Storage operations the billing services are written against.
#[async_trait]
pub trait BillingStore: Send + Sync {
    async fn find_billable_deliveries(
        &self,
        vendor_id: &str,
        society_id: &str,
        start: BsonDateTime,
        end: BsonDateTime,
    ) -> Result<Vec<Delivery>, AppError>;

    async fn find_unbilled_deliveries(
        &self,
        vendor_id: &str,
        society_id: &str,
    ) -> Result<Vec<Delivery>, AppError>;

    async fn mark_deliveries_invoiced(
        &self,
        vendor_id: &str,
        delivery_ids: &[Uuid],
        invoice_id: Uuid,
    ) -> Result<(), AppError>;

    async fn find_completed_collections_in_range(
        &self,
        vendor_id: &str,
        supplier_id: &str,
        start: BsonDateTime,
        end: BsonDateTime,
    ) -> Result<Vec<Collection>, AppError>;

    async fn find_completed_collections(
        &self,
        vendor_id: &str,
        supplier_id: &str,
    ) -> Result<Vec<Collection>, AppError>;

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), AppError>;

    async fn get_invoice(&self, vendor_id: &str, id: Uuid) -> Result<Option<Invoice>, AppError>;

    async fn delete_invoice(&self, vendor_id: &str, id: Uuid) -> Result<(), AppError>;

    async fn set_invoice_status(
        &self,
        vendor_id: &str,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<(), AppError>;

    async fn push_payment_to_invoice(
        &self,
        vendor_id: &str,
        invoice_id: Uuid,
        payment_id: Uuid,
    ) -> Result<(), AppError>;

    async fn mark_invoice_paid(
        &self,
        vendor_id: &str,
        invoice_id: Uuid,
        paid_date: BsonDateTime,
    ) -> Result<(), AppError>;

    async fn find_open_invoices_for_society(
        &self,
        vendor_id: &str,
        society_id: &str,
    ) -> Result<Vec<Invoice>, AppError>;

    async fn next_invoice_sequence(
        &self,
        vendor_id: &str,
        invoice_type: &str,
        period: &str,
    ) -> Result<i64, AppError>;

    async fn insert_payment(&self, payment: &Payment) -> Result<(), AppError>;

    async fn find_completed_payments_for_invoice(
        &self,
        vendor_id: &str,
        invoice_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>;

    async fn find_completed_payments_for_invoices(
        &self,
        vendor_id: &str,
        invoice_ids: &[Uuid],
    ) -> Result<Vec<Payment>, AppError>;

    async fn find_completed_supplier_payments(
        &self,
        vendor_id: &str,
        supplier_id: &str,
    ) -> Result<Vec<Payment>, AppError>;

    async fn upsert_attendance(
        &self,
        vendor_id: &str,
        driver_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
        note: Option<String>,
    ) -> Result<DriverAttendance, AppError>;

    async fn find_attendance_for_month(
        &self,
        vendor_id: &str,
        driver_id: &str,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> Result<Vec<DriverAttendance>, AppError>;

    async fn get_expense(&self, vendor_id: &str, id: Uuid) -> Result<Option<Expense>, AppError>;

    async fn mark_expense_paid(
        &self,
        vendor_id: &str,
        id: Uuid,
        payment_id: Uuid,
    ) -> Result<(), AppError>;

    async fn find_driver_deductible_expenses(
        &self,
        vendor_id: &str,
        driver_id: &str,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> Result<Vec<Expense>, AppError>;

    async fn get_driver(
        &self,
        vendor_id: &str,
        driver_id: &str,
    ) -> Result<Option<Driver>, AppError>;
}

#[derive(Clone)]
pub struct BillingRepository {
    deliveries: MongoCollection<Delivery>,
    collections: MongoCollection<Collection>,
    invoices: MongoCollection<Invoice>,
    payments: MongoCollection<Payment>,
    attendance: MongoCollection<DriverAttendance>,
    expenses: MongoCollection<Expense>,
    drivers: MongoCollection<Driver>,
    counters: MongoCollection<InvoiceCounter>,
}

impl BillingRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            deliveries: db.collection("deliveries"),
            collections: db.collection("collections"),
            invoices: db.collection("invoices"),
            payments: db.collection("payments"),
            attendance: db.collection("driver_attendance"),
            expenses: db.collection("expenses"),
            drivers: db.collection("drivers"),
            counters: db.collection("invoice_counters"),
        }
    }

    /// Create the indexes the vendor-scoped queries depend on.
    pub async fn init_indexes(&self) -> Result<(), AppError> {
        let delivery_idx = IndexModel::builder()
            .keys(doc! { "vendor_id": 1, "society_id": 1, "status": 1, "is_invoiced": 1 })
            .options(
                IndexOptions::builder()
                    .name("vendor_society_status_idx".to_string())
                    .build(),
            )
            .build();
        let delivery_created_idx = IndexModel::builder()
            .keys(doc! { "vendor_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("vendor_delivery_created_idx".to_string())
                    .build(),
            )
            .build();
        self.deliveries
            .create_indexes([delivery_idx, delivery_created_idx], None)
            .await?;

        let collection_idx = IndexModel::builder()
            .keys(doc! { "vendor_id": 1, "supplier_id": 1, "status": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("vendor_supplier_status_idx".to_string())
                    .build(),
            )
            .build();
        self.collections.create_index(collection_idx, None).await?;

        // Invoice numbers are unique within a vendor.
        let invoice_number_idx = IndexModel::builder()
            .keys(doc! { "vendor_id": 1, "invoice_number": 1 })
            .options(
                IndexOptions::builder()
                    .name("vendor_invoice_number_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        let invoice_party_idx = IndexModel::builder()
            .keys(doc! { "vendor_id": 1, "related_to": 1, "related_id": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("vendor_invoice_party_idx".to_string())
                    .build(),
            )
            .build();
        self.invoices
            .create_indexes([invoice_number_idx, invoice_party_idx], None)
            .await?;

        let payment_invoice_idx = IndexModel::builder()
            .keys(doc! { "vendor_id": 1, "invoice_id": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("vendor_payment_invoice_idx".to_string())
                    .build(),
            )
            .build();
        let payment_party_idx = IndexModel::builder()
            .keys(doc! { "vendor_id": 1, "related_to": 1, "related_id": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("vendor_payment_party_idx".to_string())
                    .build(),
            )
            .build();
        self.payments
            .create_indexes([payment_invoice_idx, payment_party_idx], None)
            .await?;

        // Upsert target: exactly one attendance record per driver per day.
        let attendance_idx = IndexModel::builder()
            .keys(doc! { "vendor_id": 1, "driver_id": 1, "date": 1 })
            .options(
                IndexOptions::builder()
                    .name("vendor_driver_date_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.attendance.create_index(attendance_idx, None).await?;

        let expense_idx = IndexModel::builder()
            .keys(doc! { "vendor_id": 1, "driver_id": 1, "status": 1, "expense_date": 1 })
            .options(
                IndexOptions::builder()
                    .name("vendor_driver_expense_idx".to_string())
                    .build(),
            )
            .build();
        self.expenses.create_index(expense_idx, None).await?;

        tracing::info!("Billing service indexes initialized");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Record CRUD (handler-facing, stays on the concrete type)
    // -----------------------------------------------------------------------

    pub async fn insert_delivery(&self, delivery: &Delivery) -> Result<(), AppError> {
        self.deliveries.insert_one(delivery, None).await?;
        Ok(())
    }

    pub async fn get_delivery(
        &self,
        vendor_id: &str,
        id: Uuid,
    ) -> Result<Option<Delivery>, AppError> {
        let filter = doc! { "_id": id.to_string(), "vendor_id": vendor_id };
        Ok(self.deliveries.find_one(filter, None).await?)
    }

    pub async fn replace_delivery(&self, delivery: &Delivery) -> Result<(), AppError> {
        let filter = doc! {
            "_id": delivery.id.to_string(),
            "vendor_id": &delivery.vendor_id
        };
        self.deliveries.replace_one(filter, delivery, None).await?;
        Ok(())
    }

    pub async fn insert_collection(&self, collection: &Collection) -> Result<(), AppError> {
        self.collections.insert_one(collection, None).await?;
        Ok(())
    }

    pub async fn get_collection(
        &self,
        vendor_id: &str,
        id: Uuid,
    ) -> Result<Option<Collection>, AppError> {
        let filter = doc! { "_id": id.to_string(), "vendor_id": vendor_id };
        Ok(self.collections.find_one(filter, None).await?)
    }

    pub async fn replace_collection(&self, collection: &Collection) -> Result<(), AppError> {
        let filter = doc! {
            "_id": collection.id.to_string(),
            "vendor_id": &collection.vendor_id
        };
        self.collections
            .replace_one(filter, collection, None)
            .await?;
        Ok(())
    }

    pub async fn insert_expense(&self, expense: &Expense) -> Result<(), AppError> {
        self.expenses.insert_one(expense, None).await?;
        Ok(())
    }

    pub async fn set_expense_status(
        &self,
        vendor_id: &str,
        id: Uuid,
        status: ExpenseStatus,
    ) -> Result<(), AppError> {
        let filter = doc! { "_id": id.to_string(), "vendor_id": vendor_id };
        let update = doc! {
            "$set": {
                "status": to_bson(&status).map_err(|e| AppError::InternalError(e.into()))?,
                "updated_at": BsonDateTime::now(),
            }
        };
        self.expenses.update_one(filter, update, None).await?;
        Ok(())
    }
}

#[async_trait]
impl BillingStore for BillingRepository {
    /// Completed, not-yet-invoiced deliveries for a society within a window.
    /// These are the only deliveries eligible for invoice generation.
    async fn find_billable_deliveries(
        &self,
        vendor_id: &str,
        society_id: &str,
        start: BsonDateTime,
        end: BsonDateTime,
    ) -> Result<Vec<Delivery>, AppError> {
        let filter = billable_delivery_filter(vendor_id, society_id, Some((start, end)));
        let options = FindOptions::builder()
            .sort(doc! { "created_at": 1 })
            .build();
        let cursor = self.deliveries.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Completed deliveries never attached to any invoice, newest first.
    async fn find_unbilled_deliveries(
        &self,
        vendor_id: &str,
        society_id: &str,
    ) -> Result<Vec<Delivery>, AppError> {
        let filter = billable_delivery_filter(vendor_id, society_id, None);
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self.deliveries.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Flag deliveries as invoiced and link them to the invoice.
    async fn mark_deliveries_invoiced(
        &self,
        vendor_id: &str,
        delivery_ids: &[Uuid],
        invoice_id: Uuid,
    ) -> Result<(), AppError> {
        let ids: Vec<Bson> = delivery_ids
            .iter()
            .map(|id| Bson::String(id.to_string()))
            .collect();
        let filter = doc! {
            "vendor_id": vendor_id,
            "_id": { "$in": ids },
        };
        let update = doc! {
            "$set": {
                "is_invoiced": true,
                "invoice_id": invoice_id.to_string(),
                "updated_at": BsonDateTime::now(),
            }
        };
        self.deliveries.update_many(filter, update, None).await?;
        Ok(())
    }

    /// Completed collections for a supplier within a window. No invoiced
    /// gating: suppliers settle per collection, not per invoice.
    async fn find_completed_collections_in_range(
        &self,
        vendor_id: &str,
        supplier_id: &str,
        start: BsonDateTime,
        end: BsonDateTime,
    ) -> Result<Vec<Collection>, AppError> {
        let filter = doc! {
            "vendor_id": vendor_id,
            "supplier_id": supplier_id,
            "status": "completed",
            "created_at": { "$gte": start, "$lte": end },
        };
        let options = FindOptions::builder()
            .sort(doc! { "created_at": 1 })
            .build();
        let cursor = self.collections.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// All completed collections for a supplier, newest first.
    async fn find_completed_collections(
        &self,
        vendor_id: &str,
        supplier_id: &str,
    ) -> Result<Vec<Collection>, AppError> {
        let filter = doc! {
            "vendor_id": vendor_id,
            "supplier_id": supplier_id,
            "status": "completed",
        };
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self.collections.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        self.invoices.insert_one(invoice, None).await?;
        Ok(())
    }

    async fn get_invoice(&self, vendor_id: &str, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let filter = doc! { "_id": id.to_string(), "vendor_id": vendor_id };
        Ok(self.invoices.find_one(filter, None).await?)
    }

    /// Compensating cleanup for a failed generation: the invoice must not
    /// survive if its source records could not be flagged.
    async fn delete_invoice(&self, vendor_id: &str, id: Uuid) -> Result<(), AppError> {
        let filter = doc! { "_id": id.to_string(), "vendor_id": vendor_id };
        self.invoices.delete_one(filter, None).await?;
        Ok(())
    }

    async fn set_invoice_status(
        &self,
        vendor_id: &str,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<(), AppError> {
        let filter = doc! { "_id": id.to_string(), "vendor_id": vendor_id };
        let update = doc! {
            "$set": {
                "status": to_bson(&status).map_err(|e| AppError::InternalError(e.into()))?,
                "updated_at": BsonDateTime::now(),
            }
        };
        self.invoices.update_one(filter, update, None).await?;
        Ok(())
    }

    async fn push_payment_to_invoice(
        &self,
        vendor_id: &str,
        invoice_id: Uuid,
        payment_id: Uuid,
    ) -> Result<(), AppError> {
        let filter = doc! { "_id": invoice_id.to_string(), "vendor_id": vendor_id };
        let update = doc! {
            "$push": { "payments": payment_id.to_string() },
            "$set": { "updated_at": BsonDateTime::now() },
        };
        self.invoices.update_one(filter, update, None).await?;
        Ok(())
    }

    async fn mark_invoice_paid(
        &self,
        vendor_id: &str,
        invoice_id: Uuid,
        paid_date: BsonDateTime,
    ) -> Result<(), AppError> {
        let filter = doc! { "_id": invoice_id.to_string(), "vendor_id": vendor_id };
        let update = doc! {
            "$set": {
                "status": "paid",
                "paid_date": paid_date,
                "updated_at": BsonDateTime::now(),
            }
        };
        self.invoices.update_one(filter, update, None).await?;
        Ok(())
    }

    /// Sent and overdue invoices for a society, newest first. Draft invoices
    /// are not yet owed; paid and cancelled ones are settled.
    async fn find_open_invoices_for_society(
        &self,
        vendor_id: &str,
        society_id: &str,
    ) -> Result<Vec<Invoice>, AppError> {
        let filter = doc! {
            "vendor_id": vendor_id,
            "related_to": "society",
            "related_id": society_id,
            "status": { "$in": ["sent", "overdue"] },
        };
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self.invoices.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Atomically bump and read the per-(vendor, type, month) sequence.
    async fn next_invoice_sequence(
        &self,
        vendor_id: &str,
        invoice_type: &str,
        period: &str,
    ) -> Result<i64, AppError> {
        let key = InvoiceCounter::key(vendor_id, invoice_type, period);
        let filter = doc! { "_id": &key };
        let update = doc! {
            "$inc": { "seq": 1_i64 },
            "$setOnInsert": {
                "vendor_id": vendor_id,
                "invoice_type": invoice_type,
                "period": period,
            }
        };
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let counter = self
            .counters
            .find_one_and_update(filter, update, options)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(anyhow::anyhow!("Counter upsert returned no document"))
            })?;
        Ok(counter.seq)
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), AppError> {
        self.payments.insert_one(payment, None).await?;
        Ok(())
    }

    async fn find_completed_payments_for_invoice(
        &self,
        vendor_id: &str,
        invoice_id: Uuid,
    ) -> Result<Vec<Payment>, AppError> {
        let filter = doc! {
            "vendor_id": vendor_id,
            "invoice_id": invoice_id.to_string(),
            "status": "completed",
        };
        let cursor = self.payments.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_completed_payments_for_invoices(
        &self,
        vendor_id: &str,
        invoice_ids: &[Uuid],
    ) -> Result<Vec<Payment>, AppError> {
        let ids: Vec<Bson> = invoice_ids
            .iter()
            .map(|id| Bson::String(id.to_string()))
            .collect();
        let filter = doc! {
            "vendor_id": vendor_id,
            "invoice_id": { "$in": ids },
            "status": "completed",
        };
        let cursor = self.payments.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Completed purchase payments made to a supplier.
    async fn find_completed_supplier_payments(
        &self,
        vendor_id: &str,
        supplier_id: &str,
    ) -> Result<Vec<Payment>, AppError> {
        let filter = doc! {
            "vendor_id": vendor_id,
            "related_to": "supplier",
            "related_id": supplier_id,
            "payment_type": "purchase",
            "status": "completed",
        };
        let cursor = self.payments.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Upsert the attendance mark for one driver-day. Marking the same day
    /// twice overwrites the earlier status.
    async fn upsert_attendance(
        &self,
        vendor_id: &str,
        driver_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
        note: Option<String>,
    ) -> Result<DriverAttendance, AppError> {
        let filter = attendance_key_filter(vendor_id, driver_id, date);
        let update = attendance_mark_update(status, note.as_deref())?;
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        self.attendance
            .find_one_and_update(filter, update, options)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(anyhow::anyhow!("Attendance upsert returned no document"))
            })
    }

    async fn find_attendance_for_month(
        &self,
        vendor_id: &str,
        driver_id: &str,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> Result<Vec<DriverAttendance>, AppError> {
        let filter = doc! {
            "vendor_id": vendor_id,
            "driver_id": driver_id,
            "date": {
                "$gte": month_start.format("%Y-%m-%d").to_string(),
                "$lte": month_end.format("%Y-%m-%d").to_string(),
            },
        };
        let cursor = self.attendance.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn get_expense(&self, vendor_id: &str, id: Uuid) -> Result<Option<Expense>, AppError> {
        let filter = doc! { "_id": id.to_string(), "vendor_id": vendor_id };
        Ok(self.expenses.find_one(filter, None).await?)
    }

    /// Terminal transition: the expense is settled and linked to its payment.
    async fn mark_expense_paid(
        &self,
        vendor_id: &str,
        id: Uuid,
        payment_id: Uuid,
    ) -> Result<(), AppError> {
        let filter = doc! { "_id": id.to_string(), "vendor_id": vendor_id };
        let update = doc! {
            "$set": {
                "status": "paid",
                "payment_id": payment_id.to_string(),
                "updated_at": BsonDateTime::now(),
            }
        };
        self.expenses.update_one(filter, update, None).await?;
        Ok(())
    }

    /// Approved, driver-charged, non-fuel expenses in a month: the set that
    /// deducts from the driver's salary.
    async fn find_driver_deductible_expenses(
        &self,
        vendor_id: &str,
        driver_id: &str,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> Result<Vec<Expense>, AppError> {
        let filter = doc! {
            "vendor_id": vendor_id,
            "driver_id": driver_id,
            "status": "approved",
            "charged_to": "driver",
            "category": { "$ne": "fuel" },
            "expense_date": {
                "$gte": month_start.format("%Y-%m-%d").to_string(),
                "$lte": month_end.format("%Y-%m-%d").to_string(),
            },
        };
        let cursor = self.expenses.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Drivers are read-only here; their CRUD lives with entity management.
    async fn get_driver(
        &self,
        vendor_id: &str,
        driver_id: &str,
    ) -> Result<Option<Driver>, AppError> {
        let filter = doc! { "_id": driver_id, "vendor_id": vendor_id };
        Ok(self.drivers.find_one(filter, None).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billable_filter_gates_on_completed_and_never_invoiced() {
        let filter = billable_delivery_filter("vendor-1", "society-1", None);
        assert_eq!(filter.get_str("vendor_id").unwrap(), "vendor-1");
        assert_eq!(filter.get_str("status").unwrap(), "completed");
        assert!(!filter.get_bool("is_invoiced").unwrap());
        assert!(filter.get("created_at").is_none());

        let now = BsonDateTime::now();
        let filter = billable_delivery_filter("vendor-1", "society-1", Some((now, now)));
        // The window narrows the selection; the gates stay.
        assert!(filter.get_document("created_at").is_ok());
        assert!(!filter.get_bool("is_invoiced").unwrap());
    }

    #[test]
    fn attendance_key_pins_the_driver_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let filter = attendance_key_filter("vendor-1", "driver-1", date);
        assert_eq!(filter.get_str("vendor_id").unwrap(), "vendor-1");
        assert_eq!(filter.get_str("driver_id").unwrap(), "driver-1");
        assert_eq!(filter.get_str("date").unwrap(), "2026-03-05");
    }

    #[test]
    fn remarking_a_day_rewrites_the_mark_but_never_the_identity() {
        let update = attendance_mark_update(AttendanceStatus::Absent, Some("sick")).unwrap();

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("status").unwrap(), "absent");
        assert_eq!(set.get_str("note").unwrap(), "sick");
        assert!(set.get("_id").is_none());
        assert!(set.get("created_at").is_none());

        // Identity is insert-only: a second mark matches the same key filter
        // and cannot mint a new document or change the original id.
        let on_insert = update.get_document("$setOnInsert").unwrap();
        assert!(on_insert.get("_id").is_some());
        assert!(on_insert.get("created_at").is_some());
        assert!(on_insert.get("status").is_none());
    }
}
