//! Payment application: cumulative completed payments flip an invoice to
//! paid only once they cover the total.

use billing_service::models::payment::completed_total;
use billing_service::models::{Payment, PaymentParty, PaymentStatus, PaymentType};
use billing_service::services::payments::covers_total;
use mongodb::bson::DateTime;
use uuid::Uuid;

fn completed_payment(amount: f64, invoice_id: Uuid) -> Payment {
    payment(amount, invoice_id, PaymentStatus::Completed)
}

fn payment(amount: f64, invoice_id: Uuid, status: PaymentStatus) -> Payment {
    let now = DateTime::now();
    Payment {
        id: Uuid::new_v4(),
        vendor_id: "vendor-1".into(),
        payment_type: PaymentType::Delivery,
        related_to: PaymentParty::Society,
        related_id: "society-1".into(),
        invoice_id: Some(invoice_id),
        collection_id: None,
        expense_id: None,
        amount,
        payment_method: "bank_transfer".into(),
        payment_date: now,
        status,
        reference_number: None,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn four_hundred_then_six_hundred_covers_a_thousand() {
    let invoice_id = Uuid::new_v4();
    let total = 1000.0;

    let first = vec![completed_payment(400.0, invoice_id)];
    assert!(!covers_total(completed_total(&first), total));

    let both = vec![
        completed_payment(400.0, invoice_id),
        completed_payment(600.0, invoice_id),
    ];
    assert!(covers_total(completed_total(&both), total));
}

#[test]
fn four_hundred_then_five_hundred_leaves_invoice_open() {
    let invoice_id = Uuid::new_v4();
    let payments = vec![
        completed_payment(400.0, invoice_id),
        completed_payment(500.0, invoice_id),
    ];
    assert_eq!(completed_total(&payments), 900.0);
    assert!(!covers_total(900.0, 1000.0));
}

#[test]
fn pending_and_failed_payments_never_count() {
    let invoice_id = Uuid::new_v4();
    let payments = vec![
        completed_payment(400.0, invoice_id),
        payment(600.0, invoice_id, PaymentStatus::Pending),
        payment(600.0, invoice_id, PaymentStatus::Failed),
        payment(600.0, invoice_id, PaymentStatus::Refunded),
    ];
    assert_eq!(completed_total(&payments), 400.0);
    assert!(!covers_total(completed_total(&payments), 1000.0));
}

#[test]
fn overpayment_also_covers() {
    let invoice_id = Uuid::new_v4();
    let payments = vec![
        completed_payment(800.0, invoice_id),
        completed_payment(800.0, invoice_id),
    ];
    assert!(covers_total(completed_total(&payments), 1000.0));
}
