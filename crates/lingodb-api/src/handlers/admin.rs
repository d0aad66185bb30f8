//! Write-side handlers: editor mutations, cache reload and schema
//! operations.
//!
//! Mutations do not touch the caches; the editor posts `/reload` after a
//! batch of edits, which is the system's only invalidation.

use crate::error::{error_response, json_or_error};
use crate::models::{
    DeleteResourceParams, DeleteResourceSetParams, RenamePropertyParams, RenameResourceParams,
    RenameResourceSetParams, UpdateCommentParams, UpdateResourceStringParams,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use lingodb_commons::models::ResourceRow;
use lingodb_core::AppContext;
use std::sync::Arc;

/// POST /update-resource-string - upsert one string; empty value deletes
#[post("/update-resource-string")]
pub async fn update_resource_string(
    ctx: web::Data<Arc<AppContext>>,
    params: web::Json<UpdateResourceStringParams>,
) -> impl Responder {
    let result = ctx.admin().update_resource_string(
        &params.resource_id,
        &params.resource_set,
        &params.locale_id,
        &params.value,
        params.comment.as_deref(),
    );
    json_or_error(result.map(|_| true))
}

/// POST /update-comment - rewrite only the comment of an existing row
#[post("/update-comment")]
pub async fn update_comment(
    ctx: web::Data<Arc<AppContext>>,
    params: web::Json<UpdateCommentParams>,
) -> impl Responder {
    let result = ctx.admin().update_comment(
        &params.resource_id,
        &params.resource_set,
        &params.locale_id,
        &params.comment,
    );
    json_or_error(result.map(|_| true))
}

/// POST /update-resource - upsert a full row (file/serialized resources)
#[post("/update-resource")]
pub async fn update_resource(
    ctx: web::Data<Arc<AppContext>>,
    row: web::Json<ResourceRow>,
) -> impl Responder {
    json_or_error(ctx.admin().upsert_resource(row.into_inner()).map(|_| true))
}

/// POST /delete-resource - delete one variant, or all without a locale
#[post("/delete-resource")]
pub async fn delete_resource(
    ctx: web::Data<Arc<AppContext>>,
    params: web::Json<DeleteResourceParams>,
) -> impl Responder {
    json_or_error(ctx.admin().delete_resource(
        &params.resource_id,
        &params.resource_set,
        params.locale_id.as_deref(),
    ))
}

/// POST /rename-resource - errors when the id has no rows
#[post("/rename-resource")]
pub async fn rename_resource(
    ctx: web::Data<Arc<AppContext>>,
    params: web::Json<RenameResourceParams>,
) -> impl Responder {
    let result = ctx.admin().rename_resource(
        &params.resource_id,
        &params.new_resource_id,
        &params.resource_set,
    );
    json_or_error(result.map(|_| true))
}

/// POST /rename-property - bulk rename of a dotted id prefix
#[post("/rename-property")]
pub async fn rename_property(
    ctx: web::Data<Arc<AppContext>>,
    params: web::Json<RenamePropertyParams>,
) -> impl Responder {
    let result = ctx.admin().rename_property(
        &params.property,
        &params.new_property,
        &params.resource_set,
    );
    json_or_error(result.map(|_| true))
}

/// POST /delete-resource-set
#[post("/delete-resource-set")]
pub async fn delete_resource_set(
    ctx: web::Data<Arc<AppContext>>,
    params: web::Json<DeleteResourceSetParams>,
) -> impl Responder {
    json_or_error(
        ctx.admin()
            .delete_resource_set(&params.resource_set)
            .map(|_| true),
    )
}

/// POST /rename-resource-set
#[post("/rename-resource-set")]
pub async fn rename_resource_set(
    ctx: web::Data<Arc<AppContext>>,
    params: web::Json<RenameResourceSetParams>,
) -> impl Responder {
    json_or_error(
        ctx.admin()
            .rename_resource_set(&params.old_name, &params.new_name)
            .map(|_| true),
    )
}

/// POST /reload - drop every cached resolved set; always succeeds
#[post("/reload")]
pub async fn reload(ctx: web::Data<Arc<AppContext>>) -> impl Responder {
    ctx.admin().reload();
    HttpResponse::Ok().finish()
}

/// POST /backup - snapshot the resource table
#[post("/backup")]
pub async fn create_backup(ctx: web::Data<Arc<AppContext>>) -> impl Responder {
    json_or_error(ctx.admin().create_backup().map(|_| true))
}

/// POST /restore - replace the resource table with the backup
#[post("/restore")]
pub async fn restore_backup(ctx: web::Data<Arc<AppContext>>) -> impl Responder {
    match ctx.admin().restore_backup() {
        Ok(()) => {
            // restored data must become visible to cached readers
            ctx.admin().reload();
            HttpResponse::Ok().json(true)
        }
        Err(err) => error_response(&err),
    }
}

/// POST /create-table - errors when the table already exists
#[post("/create-table")]
pub async fn create_table(ctx: web::Data<Arc<AppContext>>) -> impl Responder {
    json_or_error(ctx.admin().create_table().map(|_| true))
}

/// GET /table-exists
#[get("/table-exists")]
pub async fn table_exists(ctx: web::Data<Arc<AppContext>>) -> impl Responder {
    HttpResponse::Ok().json(ctx.admin().table_exists())
}
