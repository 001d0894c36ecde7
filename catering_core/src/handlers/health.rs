//! Health check

use crate::{models::request::ApiResponse, AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::warn;

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let mut health_info = serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "version": state.version,
        "sink": state.sink.name(),
        "sink_status": "healthy",
    });

    let status_code = match state.sink.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            warn!("Submission sink is unhealthy: {}", e);
            health_info["status"] = serde_json::Value::String("unhealthy".to_string());
            health_info["sink_status"] = serde_json::Value::String("unhealthy".to_string());
            health_info["sink_error"] = serde_json::Value::String(e.to_string());
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (status_code, Json(ApiResponse::success(health_info)))
}
