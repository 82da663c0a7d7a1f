pub mod agents;
pub mod auth;
pub mod companies;
pub mod health;
pub mod messages;
pub mod threads;

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Body of every 2xx response except `/health`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok(data))
}

pub async fn not_found() -> crate::error::ApiError {
    crate::error::ApiError::NotFound("Route".to_string())
}
