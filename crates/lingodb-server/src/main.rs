// LingoDB Server
//
// Main server binary: database-backed localization resources behind an
// admin HTTP API.

mod config;
mod logging;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use lingodb_api::routes;
use lingodb_commons::ConverterRegistry;
use lingodb_core::AppContext;
use lingodb_store::{InMemoryBackend, StorageBackend};
use log::info;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match config::ServerConfig::from_file("config.toml") {
        Ok(cfg) => cfg,
        Err(_) => {
            eprintln!("Warning: config.toml not found, using defaults");
            config::ServerConfig::default()
        }
    };

    // Initialize logging
    logging::init_logging(
        &config.logging.level,
        &config.logging.file_path,
        config.logging.log_to_console,
        config.logging.target_levels.as_ref(),
        &config.logging.format,
    )?;

    info!("Starting LingoDB Server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded: host={}, port={}, table={}",
        config.server.host, config.server.port, config.localization.resource_table
    );

    // Initialize storage backend
    let backend: Arc<dyn StorageBackend> = match config.storage.backend.as_str() {
        "memory" => Arc::new(InMemoryBackend::new()),
        other => {
            log::warn!("unknown storage backend {other:?}, falling back to in-memory");
            Arc::new(InMemoryBackend::new())
        }
    };

    // Wire the application context (store, resolver, caches, services)
    let context = Arc::new(AppContext::new(
        config.localization.clone(),
        backend,
        ConverterRegistry::new(),
    )?);
    info!(
        "Resource store ready (partition {})",
        context.store().partition()
    );

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server on {}", bind_addr);

    let workers = if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    };

    HttpServer::new(move || {
        // Admin UIs are typically served from another origin
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(Arc::clone(&context)))
            .configure(routes::configure_routes)
    })
    .bind(&bind_addr)?
    .workers(workers)
    .run()
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
