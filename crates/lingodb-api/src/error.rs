//! Error-to-response mapping.
//!
//! The core reports failures as [`LingoError`] kinds; this module owns the
//! translation into HTTP status codes and the JSON error envelope
//! `{"error": {"code": "...", "message": "..."}}`.

use actix_web::HttpResponse;
use lingodb_core::LingoError;
use serde::{Deserialize, Serialize};

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// JSON error envelope returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

impl ErrorBody {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}

/// Converts a core error into the matching HTTP response.
pub fn error_response(err: &LingoError) -> HttpResponse {
    let code = err.code();
    let body = ErrorBody::new(code, err.to_string());
    match code {
        "NOT_FOUND" => HttpResponse::NotFound().json(body),
        "ALREADY_EXISTS" => HttpResponse::Conflict().json(body),
        "INVALID_INPUT" => HttpResponse::BadRequest().json(body),
        "PERMISSION_DENIED" => HttpResponse::Forbidden().json(body),
        "TRANSLATION_ERROR" => HttpResponse::BadGateway().json(body),
        _ => {
            log::warn!("internal error on admin request: {err}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Shorthand: `Ok(value)` to JSON, `Err` through [`error_response`].
pub fn json_or_error<T: Serialize>(result: Result<T, LingoError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(err) => error_response(&err),
    }
}
