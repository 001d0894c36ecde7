//! JSON extractor that reports malformed bodies in the API's error shape

use crate::error::AppError;
use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection_message(&rejection))),
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => {
            let detail = rejection.body_text();
            if detail.contains("EOF while parsing") {
                "Empty or incomplete JSON request".to_string()
            } else {
                "Invalid JSON format".to_string()
            }
        }
        JsonRejection::JsonDataError(_) => format!("Invalid request data: {}", rejection.body_text()),
        _ => "Failed to parse JSON request".to_string(),
    }
}
