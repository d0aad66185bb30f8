//! Translation-assist endpoint.

use crate::error::error_response;
use crate::models::{TranslateQuery, TranslateResponse};
use actix_web::{get, web, HttpResponse, Responder};
use lingodb_core::{AppContext, LingoError};
use std::sync::Arc;

/// GET /translate - translate a string via an external service.
///
/// Provider failures (timeouts, HTTP errors, bad payloads) are recoverable:
/// the editor gets an empty translation plus the error message rather than
/// a failed request. Only invalid input surfaces as 4xx.
#[get("/translate")]
pub async fn translate(
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<TranslateQuery>,
) -> impl Responder {
    match ctx
        .translator()
        .translate(&query.text, &query.from, &query.to, &query.service)
        .await
    {
        Ok(translation) => HttpResponse::Ok().json(TranslateResponse {
            translation,
            error: None,
        }),
        Err(LingoError::Translation(message)) => {
            log::warn!("translation failed: {message}");
            HttpResponse::Ok().json(TranslateResponse {
                translation: String::new(),
                error: Some(message),
            })
        }
        Err(err) => error_response(&err),
    }
}
