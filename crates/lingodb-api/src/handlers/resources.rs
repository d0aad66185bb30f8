//! Read-side handlers: listings, lookups and fallback resolution.

use crate::error::{error_response, json_or_error};
use crate::models::{LocaleValue, ResourceQuery, ResourceSetQuery, ResourceVariantsQuery};
use actix_web::{get, web, HttpResponse, Responder};
use lingodb_commons::models::ResourceListingFilter;
use lingodb_core::{AppContext, LingoError};
use std::sync::Arc;

/// GET /resource-ids - distinct ids of a set with has-value flags
#[get("/resource-ids")]
pub async fn get_resource_ids(
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<ResourceSetQuery>,
) -> impl Responder {
    json_or_error(ctx.admin().resource_ids(&query.resource_set))
}

/// GET /resource-sets - distinct resource set names
#[get("/resource-sets")]
pub async fn get_resource_sets(ctx: web::Data<Arc<AppContext>>) -> impl Responder {
    json_or_error(ctx.admin().resource_sets(ResourceListingFilter::All))
}

/// GET /locales - locales of a set with display names
#[get("/locales")]
pub async fn get_locales(
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<ResourceSetQuery>,
) -> impl Responder {
    json_or_error(ctx.admin().locales(&query.resource_set))
}

/// GET /resource-string - exact stored string, no fallback
#[get("/resource-string")]
pub async fn get_resource_string(
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<ResourceQuery>,
) -> impl Responder {
    json_or_error(ctx.admin().resource_string(
        &query.resource_id,
        &query.resource_set,
        &query.locale_id,
    ))
}

/// GET /resource-item - exact full row; 404 when absent
#[get("/resource-item")]
pub async fn get_resource_item(
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<ResourceQuery>,
) -> impl Responder {
    match ctx
        .admin()
        .resource_item(&query.resource_id, &query.resource_set, &query.locale_id)
    {
        Ok(Some(row)) => HttpResponse::Ok().json(row),
        Ok(None) => error_response(&LingoError::NotFound(format!(
            "resource {:?} ({:?}) in set {:?}",
            query.resource_id, query.locale_id, query.resource_set
        ))),
        Err(err) => error_response(&err),
    }
}

/// GET /resource-strings - all locale variants of one id, padded with the
/// set's locales
#[get("/resource-strings")]
pub async fn get_resource_strings(
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<ResourceVariantsQuery>,
) -> impl Responder {
    let result = ctx
        .admin()
        .resource_strings(&query.resource_id, &query.resource_set)
        .map(|pairs| {
            pairs
                .into_iter()
                .map(|(locale_id, value)| LocaleValue { locale_id, value })
                .collect::<Vec<_>>()
        });
    json_or_error(result)
}

/// GET /resource-items - full rows of every locale variant of one id,
/// padded with the set's locales
#[get("/resource-items")]
pub async fn get_resource_items(
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<ResourceVariantsQuery>,
) -> impl Responder {
    json_or_error(
        ctx.admin()
            .resource_items(&query.resource_id, &query.resource_set),
    )
}

/// GET /resolve - cached three-tier fallback resolution
#[get("/resolve")]
pub async fn resolve(
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<ResourceQuery>,
) -> impl Responder {
    let manager = ctx.registry().get_or_create(&query.resource_set);
    json_or_error(manager.get_value(&query.resource_id, &query.locale_id))
}

/// GET /resource-grid - the editor grid for one set
#[get("/resource-grid")]
pub async fn get_resource_grid(
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<ResourceSetQuery>,
) -> impl Responder {
    json_or_error(ctx.admin().resource_grid(&query.resource_set))
}
