//! API routes configuration.
//!
//! All localization endpoints live under `/api/localization`; the health
//! check sits at `/api/healthcheck`.

use crate::handlers;
use actix_web::web;

/// Configures every LingoDB route on the given service config.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/healthcheck", web::get().to(handlers::health::healthcheck))
            .service(
                web::scope("/localization")
                    // reads
                    .service(handlers::resources::get_resource_ids)
                    .service(handlers::resources::get_resource_sets)
                    .service(handlers::resources::get_locales)
                    .service(handlers::resources::get_resource_string)
                    .service(handlers::resources::get_resource_item)
                    .service(handlers::resources::get_resource_strings)
                    .service(handlers::resources::get_resource_items)
                    .service(handlers::resources::resolve)
                    .service(handlers::resources::get_resource_grid)
                    // writes
                    .service(handlers::admin::update_resource_string)
                    .service(handlers::admin::update_comment)
                    .service(handlers::admin::update_resource)
                    .service(handlers::admin::delete_resource)
                    .service(handlers::admin::rename_resource)
                    .service(handlers::admin::rename_property)
                    .service(handlers::admin::delete_resource_set)
                    .service(handlers::admin::rename_resource_set)
                    .service(handlers::admin::reload)
                    // schema
                    .service(handlers::admin::create_backup)
                    .service(handlers::admin::restore_backup)
                    .service(handlers::admin::create_table)
                    .service(handlers::admin::table_exists)
                    // transfer + services
                    .service(handlers::transfer::export_resx)
                    .service(handlers::transfer::import_resx)
                    .service(handlers::translate::translate)
                    .service(handlers::javascript::javascript_resources),
            ),
    );
}
