//! Route table

use super::{bookings, catalog, health};
use crate::{models::request::ApiResponse, AppState};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(health::handle_health))
        .route(
            "/api/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/api/bookings/:id",
            get(bookings::get_booking).put(bookings::update_booking_status),
        )
        .route("/api/contact", post(bookings::submit_contact))
        .route("/api/prices", get(catalog::list_prices))
        .route("/api/prices/:service", get(catalog::prices_for_service))
        .route("/api/quote", post(catalog::calculate_quote))
        .route("/api/allergens", get(catalog::list_allergens))
        .route("/api/allergens/:service", get(catalog::allergens_for_service))
        .route("/api/allergen-matrix", get(catalog::allergen_matrix))
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(serde_json::json!({
        "app": state.app_name,
        "version": state.version,
        "message": "Little Jonny's Catering booking API",
        "endpoints": {
            "health": "/health",
            "bookings": "/api/bookings",
            "booking": "/api/bookings/{id}",
            "contact": "/api/contact",
            "prices": "/api/prices",
            "quote": "/api/quote",
            "allergens": "/api/allergens",
            "allergen_matrix": "/api/allergen-matrix"
        }
    })))
}
