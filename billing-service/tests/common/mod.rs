//! In-memory [`BillingStore`] used by the end-to-end billing tests.
//!
//! Mirrors the repository's query semantics (status gates, `is_invoiced`
//! gate, date windows, sort orders) over plain vectors, and can be told to
//! fail specific writes so the compensating paths are reachable.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use mongodb::bson::DateTime as BsonDateTime;
use uuid::Uuid;

use service_core::error::AppError;

use billing_service::models::{
    AttendanceStatus, Collection, Delivery, Driver, DriverAttendance, Expense, ExpenseStatus,
    Invoice, InvoiceCounter, InvoiceStatus, Payment, PaymentParty, PaymentStatus, PaymentType,
    RecordStatus, RelatedParty,
};
use billing_service::services::BillingStore;

#[derive(Default)]
struct Inner {
    deliveries: Vec<Delivery>,
    collections: Vec<Collection>,
    invoices: Vec<Invoice>,
    payments: Vec<Payment>,
    attendance: Vec<DriverAttendance>,
    expenses: Vec<Expense>,
    drivers: Vec<Driver>,
    counters: HashMap<String, i64>,
    fail_mark_deliveries: bool,
    fail_delete_invoice: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_delivery(&self, delivery: Delivery) {
        self.inner.lock().unwrap().deliveries.push(delivery);
    }

    pub fn add_collection(&self, collection: Collection) {
        self.inner.lock().unwrap().collections.push(collection);
    }

    pub fn add_driver(&self, driver: Driver) {
        self.inner.lock().unwrap().drivers.push(driver);
    }

    pub fn add_expense(&self, expense: Expense) {
        self.inner.lock().unwrap().expenses.push(expense);
    }

    pub fn delivery(&self, id: Uuid) -> Option<Delivery> {
        self.inner
            .lock()
            .unwrap()
            .deliveries
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    pub fn invoice_count(&self) -> usize {
        self.inner.lock().unwrap().invoices.len()
    }

    pub fn attendance_records(&self) -> Vec<DriverAttendance> {
        self.inner.lock().unwrap().attendance.clone()
    }

    pub fn fail_mark_deliveries(&self) {
        self.inner.lock().unwrap().fail_mark_deliveries = true;
    }

    pub fn fail_delete_invoice(&self) {
        self.inner.lock().unwrap().fail_delete_invoice = true;
    }
}

#[async_trait]
impl BillingStore for MemoryStore {
    async fn find_billable_deliveries(
        &self,
        vendor_id: &str,
        society_id: &str,
        start: BsonDateTime,
        end: BsonDateTime,
    ) -> Result<Vec<Delivery>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<Delivery> = inner
            .deliveries
            .iter()
            .filter(|d| {
                d.vendor_id == vendor_id
                    && d.society_id == society_id
                    && d.status == RecordStatus::Completed
                    && !d.is_invoiced
                    && d.created_at >= start
                    && d.created_at <= end
            })
            .cloned()
            .collect();
        records.sort_by_key(|d| d.created_at);
        Ok(records)
    }

    async fn find_unbilled_deliveries(
        &self,
        vendor_id: &str,
        society_id: &str,
    ) -> Result<Vec<Delivery>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<Delivery> = inner
            .deliveries
            .iter()
            .filter(|d| {
                d.vendor_id == vendor_id
                    && d.society_id == society_id
                    && d.status == RecordStatus::Completed
                    && !d.is_invoiced
            })
            .cloned()
            .collect();
        records.sort_by_key(|d| std::cmp::Reverse(d.created_at));
        Ok(records)
    }

    async fn mark_deliveries_invoiced(
        &self,
        vendor_id: &str,
        delivery_ids: &[Uuid],
        invoice_id: Uuid,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_mark_deliveries {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "delivery update rejected"
            )));
        }
        for delivery in inner
            .deliveries
            .iter_mut()
            .filter(|d| d.vendor_id == vendor_id && delivery_ids.contains(&d.id))
        {
            delivery.is_invoiced = true;
            delivery.invoice_id = Some(invoice_id);
            delivery.updated_at = BsonDateTime::now();
        }
        Ok(())
    }

    async fn find_completed_collections_in_range(
        &self,
        vendor_id: &str,
        supplier_id: &str,
        start: BsonDateTime,
        end: BsonDateTime,
    ) -> Result<Vec<Collection>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<Collection> = inner
            .collections
            .iter()
            .filter(|c| {
                c.vendor_id == vendor_id
                    && c.supplier_id == supplier_id
                    && c.status == RecordStatus::Completed
                    && c.created_at >= start
                    && c.created_at <= end
            })
            .cloned()
            .collect();
        records.sort_by_key(|c| c.created_at);
        Ok(records)
    }

    async fn find_completed_collections(
        &self,
        vendor_id: &str,
        supplier_id: &str,
    ) -> Result<Vec<Collection>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<Collection> = inner
            .collections
            .iter()
            .filter(|c| {
                c.vendor_id == vendor_id
                    && c.supplier_id == supplier_id
                    && c.status == RecordStatus::Completed
            })
            .cloned()
            .collect();
        records.sort_by_key(|c| std::cmp::Reverse(c.created_at));
        Ok(records)
    }

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        self.inner.lock().unwrap().invoices.push(invoice.clone());
        Ok(())
    }

    async fn get_invoice(&self, vendor_id: &str, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .invoices
            .iter()
            .find(|i| i.vendor_id == vendor_id && i.id == id)
            .cloned())
    }

    async fn delete_invoice(&self, vendor_id: &str, id: Uuid) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_delete_invoice {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "invoice delete rejected"
            )));
        }
        inner
            .invoices
            .retain(|i| !(i.vendor_id == vendor_id && i.id == id));
        Ok(())
    }

    async fn set_invoice_status(
        &self,
        vendor_id: &str,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(invoice) = inner
            .invoices
            .iter_mut()
            .find(|i| i.vendor_id == vendor_id && i.id == id)
        {
            invoice.status = status;
            invoice.updated_at = BsonDateTime::now();
        }
        Ok(())
    }

    async fn push_payment_to_invoice(
        &self,
        vendor_id: &str,
        invoice_id: Uuid,
        payment_id: Uuid,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(invoice) = inner
            .invoices
            .iter_mut()
            .find(|i| i.vendor_id == vendor_id && i.id == invoice_id)
        {
            invoice.payments.push(payment_id);
            invoice.updated_at = BsonDateTime::now();
        }
        Ok(())
    }

    async fn mark_invoice_paid(
        &self,
        vendor_id: &str,
        invoice_id: Uuid,
        paid_date: BsonDateTime,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(invoice) = inner
            .invoices
            .iter_mut()
            .find(|i| i.vendor_id == vendor_id && i.id == invoice_id)
        {
            invoice.status = InvoiceStatus::Paid;
            invoice.paid_date = Some(paid_date);
            invoice.updated_at = BsonDateTime::now();
        }
        Ok(())
    }

    async fn find_open_invoices_for_society(
        &self,
        vendor_id: &str,
        society_id: &str,
    ) -> Result<Vec<Invoice>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut invoices: Vec<Invoice> = inner
            .invoices
            .iter()
            .filter(|i| {
                i.vendor_id == vendor_id
                    && i.related_to == RelatedParty::Society
                    && i.related_id == society_id
                    && matches!(i.status, InvoiceStatus::Sent | InvoiceStatus::Overdue)
            })
            .cloned()
            .collect();
        invoices.sort_by_key(|i| std::cmp::Reverse(i.created_at));
        Ok(invoices)
    }

    async fn next_invoice_sequence(
        &self,
        vendor_id: &str,
        invoice_type: &str,
        period: &str,
    ) -> Result<i64, AppError> {
        let key = InvoiceCounter::key(vendor_id, invoice_type, period);
        let mut inner = self.inner.lock().unwrap();
        let seq = inner.counters.entry(key).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), AppError> {
        self.inner.lock().unwrap().payments.push(payment.clone());
        Ok(())
    }

    async fn find_completed_payments_for_invoice(
        &self,
        vendor_id: &str,
        invoice_id: Uuid,
    ) -> Result<Vec<Payment>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .payments
            .iter()
            .filter(|p| {
                p.vendor_id == vendor_id
                    && p.invoice_id == Some(invoice_id)
                    && p.status == PaymentStatus::Completed
            })
            .cloned()
            .collect())
    }

    async fn find_completed_payments_for_invoices(
        &self,
        vendor_id: &str,
        invoice_ids: &[Uuid],
    ) -> Result<Vec<Payment>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .payments
            .iter()
            .filter(|p| {
                p.vendor_id == vendor_id
                    && p.status == PaymentStatus::Completed
                    && p.invoice_id.is_some_and(|id| invoice_ids.contains(&id))
            })
            .cloned()
            .collect())
    }

    async fn find_completed_supplier_payments(
        &self,
        vendor_id: &str,
        supplier_id: &str,
    ) -> Result<Vec<Payment>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .payments
            .iter()
            .filter(|p| {
                p.vendor_id == vendor_id
                    && p.related_to == PaymentParty::Supplier
                    && p.related_id == supplier_id
                    && p.payment_type == PaymentType::Purchase
                    && p.status == PaymentStatus::Completed
            })
            .cloned()
            .collect())
    }

    async fn upsert_attendance(
        &self,
        vendor_id: &str,
        driver_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
        note: Option<String>,
    ) -> Result<DriverAttendance, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(record) = inner
            .attendance
            .iter_mut()
            .find(|a| a.vendor_id == vendor_id && a.driver_id == driver_id && a.date == date)
        {
            record.status = status;
            record.note = note;
            record.updated_at = BsonDateTime::now();
            return Ok(record.clone());
        }

        let now = BsonDateTime::now();
        let record = DriverAttendance {
            id: Uuid::new_v4(),
            vendor_id: vendor_id.to_string(),
            driver_id: driver_id.to_string(),
            date,
            status,
            note,
            created_at: now,
            updated_at: now,
        };
        inner.attendance.push(record.clone());
        Ok(record)
    }

    async fn find_attendance_for_month(
        &self,
        vendor_id: &str,
        driver_id: &str,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> Result<Vec<DriverAttendance>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .attendance
            .iter()
            .filter(|a| {
                a.vendor_id == vendor_id
                    && a.driver_id == driver_id
                    && a.date >= month_start
                    && a.date <= month_end
            })
            .cloned()
            .collect())
    }

    async fn get_expense(&self, vendor_id: &str, id: Uuid) -> Result<Option<Expense>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .expenses
            .iter()
            .find(|e| e.vendor_id == vendor_id && e.id == id)
            .cloned())
    }

    async fn mark_expense_paid(
        &self,
        vendor_id: &str,
        id: Uuid,
        payment_id: Uuid,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(expense) = inner
            .expenses
            .iter_mut()
            .find(|e| e.vendor_id == vendor_id && e.id == id)
        {
            expense.status = ExpenseStatus::Paid;
            expense.payment_id = Some(payment_id);
            expense.updated_at = BsonDateTime::now();
        }
        Ok(())
    }

    async fn find_driver_deductible_expenses(
        &self,
        vendor_id: &str,
        driver_id: &str,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> Result<Vec<Expense>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .expenses
            .iter()
            .filter(|e| {
                e.vendor_id == vendor_id
                    && e.driver_id.as_deref() == Some(driver_id)
                    && e.is_driver_deductible()
                    && e.expense_date >= month_start
                    && e.expense_date <= month_end
            })
            .cloned()
            .collect())
    }

    async fn get_driver(
        &self,
        vendor_id: &str,
        driver_id: &str,
    ) -> Result<Option<Driver>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .drivers
            .iter()
            .find(|d| d.vendor_id == vendor_id && d.id == driver_id)
            .cloned())
    }
}
