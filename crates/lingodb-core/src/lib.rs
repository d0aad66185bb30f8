//! Locale fallback resolution, caching and admin orchestration.
//!
//! This crate is the middle of the LingoDB stack: it turns the raw rows the
//! store hands back into resolved values (three-tier locale fallback), keeps
//! resolved sets in a process-wide invalidatable cache, and exposes the
//! administrative operations the HTTP layer calls into. The resx and
//! translation services live here as well since both are driven by the same
//! resolved data.

pub mod admin;
pub mod app_context;
pub mod cache;
pub mod error;
pub mod resolver;
pub mod resx;
pub mod translate;

pub use admin::AdminService;
pub use app_context::AppContext;
pub use cache::{ResourceManager, ResourceManagerRegistry};
pub use error::{LingoError, Result};
pub use resolver::LocaleFallbackResolver;
pub use resx::ResxConverter;
pub use translate::TranslationService;
