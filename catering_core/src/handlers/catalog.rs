//! Price list, quotes and allergen information

use crate::{
    booking::{BookingIntakeForm, Service},
    error::{AppError, Result},
    extractors::ApiJson,
    models::request::{ApiResponse, ServiceInput},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

fn parse_service(raw: &str) -> Result<Service> {
    raw.parse::<Service>()
        .map_err(|_| AppError::NotFound(format!("Unknown service '{}'", raw)))
}

pub async fn list_prices(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.price_list.entries(&state.guest_minimums)))
}

pub async fn prices_for_service(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Result<impl IntoResponse> {
    let service = parse_service(&service)?;
    Ok(Json(ApiResponse::success(
        state.price_list.entries_for(service, &state.guest_minimums),
    )))
}

pub async fn calculate_quote(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ServiceInput>,
) -> Result<impl IntoResponse> {
    let mut form = BookingIntakeForm::new(state.guest_minimums);
    input.apply_to(&mut form)?;

    Ok(Json(ApiResponse::success(
        state.price_list.quote(&form.request().services),
    )))
}

pub async fn list_allergens(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.allergens.all()))
}

pub async fn allergens_for_service(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Result<impl IntoResponse> {
    let service = parse_service(&service)?;
    Ok(Json(ApiResponse::success(state.allergens.for_service(service))))
}

pub async fn allergen_matrix(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.allergens.matrix()))
}
