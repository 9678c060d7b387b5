//! Delivery and collection record handlers.
//!
//! Records are created by driver actions and stay editable only while
//! pending. Every edit that touches quantity or rate recomputes the derived
//! amount before persistence.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::DateTime;
use uuid::Uuid;
use validator::Validate;

use service_core::error::AppError;

use crate::{
    dtos::{
        CollectionResponse, CreateCollectionRequest, CreateDeliveryRequest, DeliveryResponse,
        UpdateRecordRequest,
    },
    middleware::VendorContext,
    models::{Collection, Delivery, RecordStatus},
    AppState,
};

pub async fn create_delivery(
    State(state): State<AppState>,
    vendor: VendorContext,
    Json(payload): Json<CreateDeliveryRequest>,
) -> Result<(StatusCode, Json<DeliveryResponse>), AppError> {
    payload.validate()?;

    let now = DateTime::now();
    let mut delivery = Delivery {
        id: Uuid::new_v4(),
        vendor_id: vendor.vendor_id.clone(),
        society_id: payload.society_id,
        vehicle_id: payload.vehicle_id,
        vehicle_number: payload.vehicle_number,
        driver_id: payload.driver_id,
        driver_name: payload.driver_name,
        quantity: payload.quantity,
        rate: payload.rate,
        total_amount: 0.0,
        status: RecordStatus::Pending,
        is_invoiced: false,
        invoice_id: None,
        created_at: now,
        updated_at: now,
    };
    delivery.recompute_total();

    tracing::info!(
        delivery_id = %delivery.id,
        vendor_id = %vendor.vendor_id,
        society_id = %delivery.society_id,
        total_amount = delivery.total_amount,
        "Creating delivery"
    );

    state.repository.insert_delivery(&delivery).await?;

    Ok((StatusCode::CREATED, Json(DeliveryResponse::from(delivery))))
}

pub async fn update_delivery(
    State(state): State<AppState>,
    vendor: VendorContext,
    Path(delivery_id): Path<Uuid>,
    Json(payload): Json<UpdateRecordRequest>,
) -> Result<Json<DeliveryResponse>, AppError> {
    payload.validate()?;

    let mut delivery = state
        .repository
        .get_delivery(&vendor.vendor_id, delivery_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Delivery not found")))?;

    if !delivery.is_editable() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Only pending records can be edited (current status: {})",
            delivery.status.as_str()
        )));
    }

    if let Some(quantity) = payload.quantity {
        delivery.quantity = quantity;
    }
    if let Some(rate) = payload.rate {
        delivery.rate = rate;
    }
    if let Some(status) = payload.status {
        delivery.status = status;
    }
    delivery.recompute_total();
    delivery.updated_at = DateTime::now();

    state.repository.replace_delivery(&delivery).await?;

    Ok(Json(DeliveryResponse::from(delivery)))
}

pub async fn create_collection(
    State(state): State<AppState>,
    vendor: VendorContext,
    Json(payload): Json<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<CollectionResponse>), AppError> {
    payload.validate()?;

    let now = DateTime::now();
    let mut collection = Collection {
        id: Uuid::new_v4(),
        vendor_id: vendor.vendor_id.clone(),
        supplier_id: payload.supplier_id,
        vehicle_id: payload.vehicle_id,
        vehicle_number: payload.vehicle_number,
        driver_id: payload.driver_id,
        driver_name: payload.driver_name,
        quantity: payload.quantity,
        rate: payload.rate,
        total_amount: 0.0,
        status: RecordStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    collection.recompute_total();

    tracing::info!(
        collection_id = %collection.id,
        vendor_id = %vendor.vendor_id,
        supplier_id = %collection.supplier_id,
        total_amount = collection.total_amount,
        "Creating collection"
    );

    state.repository.insert_collection(&collection).await?;

    Ok((
        StatusCode::CREATED,
        Json(CollectionResponse::from(collection)),
    ))
}

pub async fn update_collection(
    State(state): State<AppState>,
    vendor: VendorContext,
    Path(collection_id): Path<Uuid>,
    Json(payload): Json<UpdateRecordRequest>,
) -> Result<Json<CollectionResponse>, AppError> {
    payload.validate()?;

    let mut collection = state
        .repository
        .get_collection(&vendor.vendor_id, collection_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Collection not found")))?;

    if !collection.is_editable() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Only pending records can be edited (current status: {})",
            collection.status.as_str()
        )));
    }

    if let Some(quantity) = payload.quantity {
        collection.quantity = quantity;
    }
    if let Some(rate) = payload.rate {
        collection.rate = rate;
    }
    if let Some(status) = payload.status {
        collection.status = status;
    }
    collection.recompute_total();
    collection.updated_at = DateTime::now();

    state.repository.replace_collection(&collection).await?;

    Ok(Json(CollectionResponse::from(collection)))
}
