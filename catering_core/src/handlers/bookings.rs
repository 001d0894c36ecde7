//! Booking and contact form submissions

use crate::{
    booking::{BookingIntakeForm, BOOKING_SUCCESS_MESSAGE},
    contact::{ContactForm, CONTACT_SUCCESS_MESSAGE},
    error::{AppError, Result},
    extractors::ApiJson,
    models::request::{ApiResponse, BookingFormInput, BookingStatusInput, ContactFormInput, ListQuery},
    notify::TracingPresenter,
    pricing::Quote,
    sink::{SubmissionReceipt, SubmissionStore},
    validation::Validatable,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    #[serde(flatten)]
    pub receipt: SubmissionReceipt,
    pub quote: Quote,
}

pub async fn create_booking(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<BookingFormInput>,
) -> Result<impl IntoResponse> {
    input.validate_request()?;

    let mut form = BookingIntakeForm::new(state.guest_minimums);
    input.apply_to(&mut form)?;

    let receipt = form.submit(state.sink.as_ref(), &TracingPresenter).await?;
    let quote = state.price_list.quote(&form.request().services);
    info!(id = %receipt.id, total_pence = quote.total_pence, "booking request received");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            BookingConfirmation { receipt, quote },
            BOOKING_SUCCESS_MESSAGE,
        )),
    ))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ContactFormInput>,
) -> Result<impl IntoResponse> {
    input.validate_request()?;

    let mut form = ContactForm::new();
    input.apply_to(&mut form);

    let receipt = form.submit(state.sink.as_ref(), &TracingPresenter).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(receipt, CONTACT_SUCCESS_MESSAGE)),
    ))
}

fn require_store(state: &AppState) -> Result<&Arc<dyn SubmissionStore>> {
    state.store.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable(format!(
            "The {} submission sink does not keep bookings",
            state.sink.name()
        ))
    })
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    params.validate_request()?;
    let store = require_store(&state)?;

    let bookings = store.list_bookings(params.limit(), params.offset()).await?;
    Ok(Json(ApiResponse::success(bookings)))
}

fn parse_booking_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::BadRequest(format!("Invalid booking id '{}'", id)))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_booking_id(&id)?;
    let store = require_store(&state)?;

    match store.get_booking(id).await? {
        Some(booking) => Ok(Json(ApiResponse::success(booking))),
        None => Err(AppError::NotFound(format!("Booking {} not found", id))),
    }
}

pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<BookingStatusInput>,
) -> Result<impl IntoResponse> {
    let id = parse_booking_id(&id)?;
    let store = require_store(&state)?;

    match store.update_status(id, input.status).await? {
        Some(booking) => {
            info!(%id, status = %booking.status, "booking updated");
            Ok(Json(ApiResponse::success_with_message(
                booking,
                "Booking updated successfully",
            )))
        }
        None => Err(AppError::NotFound(format!("Booking {} not found", id))),
    }
}
