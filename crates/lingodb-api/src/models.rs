//! Request and response models for the admin API.

use serde::{Deserialize, Serialize};

fn default_locale() -> String {
    String::new()
}

// ===== Query parameters (GET) =====

#[derive(Debug, Deserialize)]
pub struct ResourceSetQuery {
    pub resource_set: String,
}

#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    pub resource_id: String,
    pub resource_set: String,
    #[serde(default = "default_locale")]
    pub locale_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ResourceVariantsQuery {
    pub resource_id: String,
    pub resource_set: String,
}

#[derive(Debug, Deserialize)]
pub struct TranslateQuery {
    pub text: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub service: String,
}

#[derive(Debug, Deserialize)]
pub struct JavaScriptResourcesQuery {
    #[serde(default = "default_js_var_name")]
    pub var_name: String,
    pub resource_set: String,
    #[serde(default = "default_locale")]
    pub locale_id: String,
    /// `resdb` (database) is the only supported source; `auto` maps to it.
    #[serde(default)]
    pub resource_type: String,
    /// Mode 0 drops control-scoped (dotted) keys; any other mode keeps them.
    #[serde(default = "default_resource_mode")]
    pub resource_mode: i32,
}

fn default_js_var_name() -> String {
    "resources".to_string()
}

fn default_resource_mode() -> i32 {
    1
}

// ===== Request bodies (POST) =====

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResourceStringParams {
    pub resource_id: String,
    pub resource_set: String,
    #[serde(default = "default_locale")]
    pub locale_id: String,
    /// Empty value means delete this locale's row.
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCommentParams {
    pub resource_id: String,
    pub resource_set: String,
    #[serde(default = "default_locale")]
    pub locale_id: String,
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResourceParams {
    pub resource_id: String,
    pub resource_set: String,
    /// Absent or empty cascades over all locale variants.
    #[serde(default)]
    pub locale_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenameResourceParams {
    pub resource_id: String,
    pub new_resource_id: String,
    pub resource_set: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenamePropertyParams {
    pub property: String,
    pub new_property: String,
    pub resource_set: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResourceSetParams {
    pub resource_set: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenameResourceSetParams {
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResxParams {
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub resource_sets: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResxParams {
    #[serde(default)]
    pub input_path: Option<String>,
}

// ===== Responses =====

/// A resource value in one locale, for the variants listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleValue {
    pub locale_id: String,
    pub value: String,
}

/// Translation result: the string, or empty with an error message when the
/// provider failed recoverably or is not configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
