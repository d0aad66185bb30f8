//! Shared models, locale helpers and configuration for LingoDB.
//!
//! This crate holds everything that more than one LingoDB crate needs to
//! agree on: the persisted resource row shape, the decoded value variants,
//! locale tag handling and the localization configuration block.

pub mod config;
pub mod convert;
pub mod locale;
pub mod models;

pub use config::LocalizationConfig;
pub use convert::{ConverterRegistry, ResourceSetValueConverter};
pub use models::{
    FileDescriptor, FileKind, ResourceIdItem, ResourceListingFilter, ResourceRow, ResourceType,
    ResourceValue,
};
