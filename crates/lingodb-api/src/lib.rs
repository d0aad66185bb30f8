//! HTTP admin surface for LingoDB.
//!
//! actix-web handlers over the core [`lingodb_core::AppContext`]: resource
//! listings and lookups, editor mutations, resx transfer, translation
//! assist and the JavaScript resource handler. Handlers convert core error
//! kinds into JSON error envelopes with matching status codes; the core
//! itself never sees HTTP.

pub mod error;
pub mod handlers;
pub mod javascript;
pub mod models;
pub mod routes;
