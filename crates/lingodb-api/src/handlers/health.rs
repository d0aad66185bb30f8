//! Health check endpoint.

use actix_web::{HttpResponse, Responder};
use serde_json::json;

/// GET /healthcheck
pub async fn healthcheck() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
    }))
}
