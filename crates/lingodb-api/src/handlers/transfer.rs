//! Resx export and import endpoints.

use crate::error::json_or_error;
use crate::models::{ExportResxParams, ImportResxParams};
use actix_web::{post, web, Responder};
use lingodb_core::AppContext;
use std::path::Path;
use std::sync::Arc;

/// POST /export-resx - write resx files for the named sets (or all)
#[post("/export-resx")]
pub async fn export_resx(
    ctx: web::Data<Arc<AppContext>>,
    params: web::Json<ExportResxParams>,
) -> impl Responder {
    let output = params.output_path.as_deref().map(Path::new);
    json_or_error(ctx.resx().export(output, params.resource_sets.as_deref()))
}

/// POST /import-resx - import every resx file under the given directory
#[post("/import-resx")]
pub async fn import_resx(
    ctx: web::Data<Arc<AppContext>>,
    params: web::Json<ImportResxParams>,
) -> impl Responder {
    let input = params.input_path.as_deref().map(Path::new);
    let result = ctx.resx().import(input);
    if result.is_ok() {
        // imported rows must win over any cached sets
        ctx.admin().reload();
    }
    json_or_error(result)
}
