//! Outstanding aggregation: supplier set-difference reconciliation and the
//! society invoice/unbilled split. Outstanding stays raw and signed.

use billing_service::models::{
    Collection, Delivery, Invoice, InvoiceStatus, InvoiceType, Payment, PaymentParty,
    PaymentStatus, PaymentType, RecordStatus, RelatedParty,
};
use billing_service::services::outstanding::{summarize_society, summarize_supplier};
use mongodb::bson::DateTime;
use uuid::Uuid;

fn collection(quantity: f64, rate: f64) -> Collection {
    let now = DateTime::now();
    let mut c = Collection {
        id: Uuid::new_v4(),
        vendor_id: "vendor-1".into(),
        supplier_id: "supplier-1".into(),
        vehicle_id: "vehicle-1".into(),
        vehicle_number: "MH01AA1111".into(),
        driver_id: "driver-1".into(),
        driver_name: "Mahesh".into(),
        quantity,
        rate,
        total_amount: 0.0,
        status: RecordStatus::Completed,
        created_at: now,
        updated_at: now,
    };
    c.recompute_total();
    c
}

fn supplier_payment(amount: f64, collection_id: Option<Uuid>) -> Payment {
    let now = DateTime::now();
    Payment {
        id: Uuid::new_v4(),
        vendor_id: "vendor-1".into(),
        payment_type: PaymentType::Purchase,
        related_to: PaymentParty::Supplier,
        related_id: "supplier-1".into(),
        invoice_id: None,
        collection_id,
        expense_id: None,
        amount,
        payment_method: "cash".into(),
        payment_date: now,
        status: PaymentStatus::Completed,
        reference_number: None,
        created_at: now,
        updated_at: now,
    }
}

fn open_invoice(total: f64, status: InvoiceStatus) -> Invoice {
    let now = DateTime::now();
    Invoice {
        id: Uuid::new_v4(),
        vendor_id: "vendor-1".into(),
        invoice_number: "DEL-202603-0001".into(),
        invoice_type: InvoiceType::Delivery,
        related_to: RelatedParty::Society,
        related_id: "society-1".into(),
        period_start: None,
        period_end: None,
        items: Vec::new(),
        subtotal: total,
        tax: 0.0,
        discount: 0.0,
        total,
        status,
        due_date: None,
        paid_date: None,
        payments: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn invoice_payment(amount: f64, invoice_id: Uuid) -> Payment {
    let mut p = supplier_payment(amount, None);
    p.payment_type = PaymentType::Delivery;
    p.related_to = PaymentParty::Society;
    p.related_id = "society-1".into();
    p.invoice_id = Some(invoice_id);
    p
}

fn unbilled_delivery(quantity: f64, rate: f64) -> Delivery {
    let now = DateTime::now();
    let mut d = Delivery {
        id: Uuid::new_v4(),
        vendor_id: "vendor-1".into(),
        society_id: "society-1".into(),
        vehicle_id: "vehicle-1".into(),
        vehicle_number: "MH01AA1111".into(),
        driver_id: "driver-1".into(),
        driver_name: "Mahesh".into(),
        quantity,
        rate,
        total_amount: 0.0,
        status: RecordStatus::Completed,
        is_invoiced: false,
        invoice_id: None,
        created_at: now,
        updated_at: now,
    };
    d.recompute_total();
    d
}

#[test]
fn supplier_unpaid_is_a_set_difference_on_collection_links() {
    let paid_one = collection(1000.0, 4.0);
    let unpaid_one = collection(500.0, 4.0);
    let unpaid_two = collection(250.0, 4.0);

    let payments = vec![supplier_payment(4000.0, Some(paid_one.id))];
    let summary = summarize_supplier(
        vec![paid_one.clone(), unpaid_one.clone(), unpaid_two.clone()],
        &payments,
    );

    assert_eq!(summary.total_collections, 7000.0);
    assert_eq!(summary.total_paid, 4000.0);
    assert_eq!(summary.outstanding, 3000.0);

    let unpaid_ids: Vec<Uuid> = summary.unpaid_collections.iter().map(|c| c.id).collect();
    assert_eq!(unpaid_ids, vec![unpaid_one.id, unpaid_two.id]);
}

#[test]
fn supplier_overpayment_yields_negative_outstanding() {
    let c = collection(100.0, 5.0);
    let payments = vec![supplier_payment(800.0, Some(c.id))];
    let summary = summarize_supplier(vec![c], &payments);

    assert_eq!(summary.total_collections, 500.0);
    assert_eq!(summary.total_paid, 800.0);
    // Raw signed figure; no clamping at the aggregation layer.
    assert_eq!(summary.outstanding, -300.0);
    assert!(summary.unpaid_collections.is_empty());
}

#[test]
fn supplier_payments_without_collection_links_reduce_nothing_from_the_list() {
    let a = collection(100.0, 5.0);
    let b = collection(200.0, 5.0);
    // A lump-sum payment with no collection link lowers the balance but
    // leaves both collections in the unpaid list.
    let payments = vec![supplier_payment(600.0, None)];
    let summary = summarize_supplier(vec![a, b], &payments);

    assert_eq!(summary.outstanding, 900.0);
    assert_eq!(summary.unpaid_collections.len(), 2);
}

#[test]
fn society_outstanding_splits_invoiced_from_unbilled() {
    let sent = open_invoice(10000.0, InvoiceStatus::Sent);
    let overdue = open_invoice(5000.0, InvoiceStatus::Overdue);
    let payments = vec![invoice_payment(4000.0, sent.id)];
    let unbilled = vec![unbilled_delivery(1000.0, 5.0), unbilled_delivery(200.0, 5.0)];

    let summary = summarize_society(vec![sent.clone(), overdue.clone()], &payments, unbilled);

    assert_eq!(summary.total_invoiced, 15000.0);
    assert_eq!(summary.total_paid, 4000.0);
    assert_eq!(summary.total_outstanding, 11000.0);

    // Unbilled deliveries are a separate bucket, not part of outstanding.
    assert_eq!(summary.unbilled_amount, 5000.0 + 1000.0);
    assert_eq!(summary.unbilled_deliveries.len(), 2);

    let per_invoice: Vec<(Uuid, f64)> = summary
        .invoices
        .iter()
        .map(|(inv, paid)| (inv.id, *paid))
        .collect();
    assert_eq!(per_invoice, vec![(sent.id, 4000.0), (overdue.id, 0.0)]);
}

#[test]
fn society_with_no_open_invoices_owes_nothing_on_paper() {
    let unbilled = vec![unbilled_delivery(1000.0, 5.0)];
    let summary = summarize_society(Vec::new(), &[], unbilled);

    assert_eq!(summary.total_invoiced, 0.0);
    assert_eq!(summary.total_outstanding, 0.0);
    assert_eq!(summary.unbilled_amount, 5000.0);
}
