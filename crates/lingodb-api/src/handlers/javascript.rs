//! JavaScript resource handler.
//!
//! Returns a `text/javascript` body assigning the locale-merged resource
//! dictionary of a set to a caller-named variable, with a trailing `dbRes`
//! lookup helper. Resolution goes through the cache registry, so repeated
//! page loads do not hit the store.

use crate::error::error_response;
use crate::javascript::{is_valid_var_name, serialize_resource_dictionary};
use crate::models::JavaScriptResourcesQuery;
use actix_web::{get, web, HttpResponse, Responder};
use lingodb_commons::models::ResourceValue;
use lingodb_core::{AppContext, LingoError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// GET /javascript-resources
#[get("/javascript-resources")]
pub async fn javascript_resources(
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<JavaScriptResourcesQuery>,
) -> impl Responder {
    // the variable name is embedded into script output; validate it hard
    if !is_valid_var_name(&query.var_name) {
        return error_response(&LingoError::InvalidInput(format!(
            "invalid variable name: {:?}",
            query.var_name
        )));
    }
    if query.resource_set.is_empty() {
        return error_response(&LingoError::InvalidInput(
            "resource set must not be empty".to_string(),
        ));
    }
    // there is no ambient UI culture on the server side; callers must name
    // the locale they want
    if query.locale_id.eq_ignore_ascii_case("auto") {
        return error_response(&LingoError::InvalidInput(
            "locale 'auto' is not supported; pass an explicit locale".to_string(),
        ));
    }
    match query.resource_type.to_ascii_lowercase().as_str() {
        "" | "auto" | "resdb" => {}
        other => {
            return error_response(&LingoError::InvalidInput(format!(
                "unsupported resource type: {other:?}"
            )))
        }
    }

    let manager = ctx.registry().get_or_create(&query.resource_set);
    let resolved = match manager.get_resource_set(&query.locale_id) {
        Ok(resolved) => resolved,
        Err(err) => return error_response(&err),
    };

    // only string values are scriptable; mode 0 additionally drops
    // control-scoped (dotted) keys
    let local_only = query.resource_mode == 0;
    let strings: BTreeMap<String, String> = resolved
        .iter()
        .filter(|(key, _)| !(local_only && key.contains('.')))
        .filter_map(|(key, value)| match value {
            ResourceValue::Text(text) => Some((key.clone(), text.clone())),
            _ => None,
        })
        .collect();

    let script = serialize_resource_dictionary(&strings, &query.var_name);
    HttpResponse::Ok()
        .content_type("text/javascript; charset=utf-8")
        .body(script)
}
