//! Mock payment endpoints.
//!
//! Nothing is looked up or stored: each handler answers with a fixed payload.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Local;
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::StatusResponse,
    models::{PaymentDetails, PaymentStatus, PaymentType},
    services::record_payment,
    AppState,
};

/// Transaction id reported for every processed payment.
pub const MOCK_TRANSACTION_ID: &str = "fb908151-d249-4d30-a6a1-4705729394f4";

pub const ACCEPTED: &str = "Accepted";

pub async fn status(
    State(state): State<AppState>,
    Path(reference_no): Path<String>,
) -> Json<StatusResponse> {
    tracing::info!(
        reference_no = %reference_no,
        "{}|Request to Payment Status of Service... ",
        state.name.get()
    );

    Json(StatusResponse::ok("Payment Status OK").with_reference(reference_no))
}

/// Accepts any JSON object and ignores its contents. Malformed JSON is a 400.
pub async fn process_payments(
    State(state): State<AppState>,
    payload: Result<Json<PaymentDetails>, JsonRejection>,
) -> Result<Json<PaymentStatus>, AppError> {
    let Json(details) = payload?;
    tracing::info!(
        "{}|Request to process payments... {:?}",
        state.name.get(),
        details
    );

    let now = Local::now().naive_local();
    let payment = PaymentStatus {
        transaction_id: MOCK_TRANSACTION_ID.to_string(),
        transaction_date: now,
        status: ACCEPTED.to_string(),
        reference_no: Uuid::new_v4().to_string(),
        payment_date: now,
        payment_type: PaymentType::CreditCard,
    };
    record_payment(payment.payment_type);

    Ok(Json(payment))
}

pub async fn cancel(
    State(state): State<AppState>,
    Path(reference_no): Path<String>,
) -> Json<StatusResponse> {
    tracing::info!(
        reference_no = %reference_no,
        "{}|Request to Cancel payments... ",
        state.name.get()
    );

    Json(StatusResponse::ok("Cancellation-OK").with_reference(reference_no))
}

pub async fn update(
    State(state): State<AppState>,
    Path(reference_no): Path<String>,
) -> Json<StatusResponse> {
    tracing::info!(
        reference_no = %reference_no,
        "{}|Request to Update payments... ",
        state.name.get()
    );

    Json(StatusResponse::ok("Update-OK").with_reference(reference_no))
}
