//! Core data model for localization resources.
//!
//! A [`ResourceRow`] is the persisted unit: one value for one
//! `(resource_set, resource_id, locale_id)` combination. The tuple is unique
//! by construction; the storage key encodes exactly those three components.
//!
//! Values come in three closed kinds (see [`ResourceType`]):
//! - plain text stored directly in `value`
//! - file payloads (`FileResource`) where `value` holds a
//!   `filename;kind[;encoding]` descriptor and the payload lives in
//!   `text_file` or `bin_file`
//! - serialized structured values where `value` holds a JSON document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind discriminator for a stored resource value.
///
/// This is a closed set: there is no open-ended type-name dispatch. Legacy
/// rows imported with an unrecognized type tag are treated as `Serialized`
/// and decoded best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResourceType {
    /// Plain string value in the `value` column.
    #[default]
    Text,
    /// File payload; `value` holds the descriptor, `text_file`/`bin_file`
    /// hold the content.
    FileResource,
    /// JSON-serialized structured value in the `value` column.
    Serialized,
}

impl ResourceType {
    /// Wire/interchange name of this type tag. The empty string means plain
    /// text, matching the legacy resx/database convention.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Text => "",
            ResourceType::FileResource => "FileResource",
            ResourceType::Serialized => "Serialized",
        }
    }

    /// Parses an interchange type tag. Unknown non-empty tags map to
    /// `Serialized` so that foreign exports still import.
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "" => ResourceType::Text,
            "FileResource" => ResourceType::FileResource,
            _ => ResourceType::Serialized,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One persisted localization resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRow {
    /// Logical key name. May contain `.` for nested/control-scoped names
    /// (e.g. `lblName.Text`).
    pub resource_id: String,

    /// IETF language tag, lowercase, or empty for the invariant locale.
    pub locale_id: String,

    /// Logical grouping the resource belongs to (a "file" or "page" in the
    /// legacy model).
    pub resource_set: String,

    /// Textual payload, or the file descriptor for file resources.
    pub value: Option<String>,

    /// Value kind discriminator.
    #[serde(default)]
    pub resource_type: ResourceType,

    /// Binary payload for file resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_file: Option<Vec<u8>>,

    /// Text payload for file resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_file: Option<String>,

    /// Original file name for file resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Translator/editor note, independent of the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Discriminator for pluggable value converters (0 = none).
    #[serde(default)]
    pub value_type: i32,

    /// Last write time, stamped server-side on every write. Values sent by
    /// clients are ignored.
    #[serde(default = "unix_epoch")]
    pub updated: DateTime<Utc>,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl ResourceRow {
    /// Creates a plain-text resource row. `updated` is stamped by the store
    /// on write; the value set here is a placeholder.
    pub fn new_text(
        resource_id: impl Into<String>,
        locale_id: impl Into<String>,
        resource_set: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            locale_id: locale_id.into(),
            resource_set: resource_set.into(),
            value: Some(value.into()),
            resource_type: ResourceType::Text,
            bin_file: None,
            text_file: None,
            file_name: None,
            comment: None,
            value_type: 0,
            updated: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// True when the row carries a non-empty textual value.
    pub fn has_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Decodes the stored payload into a surfaced [`ResourceValue`].
    ///
    /// Decode failures never escape: a corrupt serialized payload or a file
    /// resource with a missing companion column degrades to an empty text
    /// value. Localization data is operator-editable and a bad row must not
    /// take resolution down with it.
    pub fn decode(&self) -> ResourceValue {
        match self.resource_type {
            ResourceType::Text => {
                ResourceValue::Text(self.value.clone().unwrap_or_default())
            }
            ResourceType::FileResource => self.decode_file(),
            ResourceType::Serialized => {
                let raw = self.value.as_deref().unwrap_or("");
                match serde_json::from_str::<serde_json::Value>(raw) {
                    Ok(json) => ResourceValue::Json(json),
                    Err(_) => ResourceValue::Text(String::new()),
                }
            }
        }
    }

    fn decode_file(&self) -> ResourceValue {
        let descriptor = self
            .value
            .as_deref()
            .and_then(|v| FileDescriptor::parse(v).ok());
        match descriptor.map(|d| d.kind) {
            Some(FileKind::Text) => {
                ResourceValue::Text(self.text_file.clone().unwrap_or_default())
            }
            Some(FileKind::Binary) => {
                ResourceValue::Bytes(self.bin_file.clone().unwrap_or_default())
            }
            // No parseable descriptor: fall back on whichever payload column
            // is populated.
            None => match (&self.text_file, &self.bin_file) {
                (Some(text), _) => ResourceValue::Text(text.clone()),
                (None, Some(bytes)) => ResourceValue::Bytes(bytes.clone()),
                (None, None) => ResourceValue::Text(String::new()),
            },
        }
    }
}

/// A resource value after decoding, as surfaced to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceValue {
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

impl ResourceValue {
    /// Returns the textual form when this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResourceValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes the value, returning the text or an empty string for
    /// non-text payloads.
    pub fn into_text_lossy(self) -> String {
        match self {
            ResourceValue::Text(s) => s,
            ResourceValue::Json(json) => json.to_string(),
            ResourceValue::Bytes(_) => String::new(),
        }
    }
}

/// Payload kind of a file resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Binary,
}

/// Parsed form of the `filename;kind[;encoding]` descriptor stored in the
/// `value` column of file resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub file_name: String,
    pub kind: FileKind,
    pub encoding: Option<String>,
}

impl FileDescriptor {
    /// Builds the descriptor string for storage.
    pub fn encode(file_name: &str, kind: FileKind) -> String {
        let kind = match kind {
            FileKind::Text => "text",
            FileKind::Binary => "binary",
        };
        format!("{file_name};{kind}")
    }

    /// Parses a stored descriptor. Errors on a missing or unknown kind tag.
    pub fn parse(descriptor: &str) -> Result<Self, String> {
        let mut parts = descriptor.split(';');
        let file_name = parts
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| format!("file descriptor has no file name: {descriptor:?}"))?;
        let kind = match parts.next().map(str::trim) {
            Some("text") => FileKind::Text,
            Some("binary") => FileKind::Binary,
            other => {
                return Err(format!(
                    "file descriptor has unknown kind {:?}: {descriptor:?}",
                    other.unwrap_or("")
                ))
            }
        };
        Ok(Self {
            file_name: file_name.to_string(),
            kind,
            encoding: parts.next().map(str::to_string),
        })
    }

    /// Derives descriptor + kind from a file name extension, the way file
    /// uploads are classified: textual web assets stay text, everything else
    /// is stored as raw bytes.
    pub fn for_upload(file_name: &str) -> Self {
        let ext = file_name
            .rsplit('.')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        let kind = match ext.as_str() {
            "txt" | "css" | "js" | "htm" | "html" | "xml" => FileKind::Text,
            _ => FileKind::Binary,
        };
        Self {
            file_name: file_name.to_string(),
            kind,
            encoding: None,
        }
    }
}

/// Filter for resource-set listings. The local/global split is a naming
/// convention: sets named like markup pages are "local" page resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResourceListingFilter {
    #[default]
    All,
    LocalOnly,
    GlobalOnly,
}

/// Markup-page extensions that mark a resource set as "local".
pub const LOCAL_SET_EXTENSIONS: &[&str] = &[".aspx", ".ascx", ".master", ".sitemap"];

impl ResourceListingFilter {
    /// Whether a set name passes this filter.
    pub fn matches(&self, resource_set: &str) -> bool {
        let is_local = LOCAL_SET_EXTENSIONS
            .iter()
            .any(|ext| resource_set.to_ascii_lowercase().ends_with(ext));
        match self {
            ResourceListingFilter::All => true,
            ResourceListingFilter::LocalOnly => is_local,
            ResourceListingFilter::GlobalOnly => !is_local,
        }
    }
}

/// Short listing entry for a resource id within a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdItem {
    pub resource_id: String,
    /// True when at least one locale variant carries a non-empty value.
    pub has_value: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_round_trip() {
        assert_eq!(ResourceType::parse(""), ResourceType::Text);
        assert_eq!(ResourceType::parse("FileResource"), ResourceType::FileResource);
        assert_eq!(ResourceType::parse("Serialized"), ResourceType::Serialized);
        // Unknown legacy tags decode best-effort as serialized payloads
        assert_eq!(
            ResourceType::parse("System.Decimal, mscorlib"),
            ResourceType::Serialized
        );
        assert_eq!(ResourceType::FileResource.as_str(), "FileResource");
    }

    #[test]
    fn test_decode_plain_text() {
        let row = ResourceRow::new_text("Today", "de", "Resources", "Heute");
        assert_eq!(row.decode(), ResourceValue::Text("Heute".to_string()));
    }

    #[test]
    fn test_decode_text_file_resource() {
        let mut row = ResourceRow::new_text("Header", "", "Resources", "");
        row.resource_type = ResourceType::FileResource;
        row.value = Some(FileDescriptor::encode("header.html", FileKind::Text));
        row.text_file = Some("<h1>hi</h1>".to_string());
        row.file_name = Some("header.html".to_string());
        assert_eq!(row.decode(), ResourceValue::Text("<h1>hi</h1>".to_string()));
    }

    #[test]
    fn test_decode_binary_file_resource() {
        let mut row = ResourceRow::new_text("Sound", "", "Resources", "");
        row.resource_type = ResourceType::FileResource;
        row.value = Some(FileDescriptor::encode("ding.wav", FileKind::Binary));
        row.bin_file = Some(vec![1, 2, 3]);
        assert_eq!(row.decode(), ResourceValue::Bytes(vec![1, 2, 3]));
    }

    #[test]
    fn test_decode_serialized_value_is_used() {
        let mut row = ResourceRow::new_text("Limits", "", "Resources", "");
        row.resource_type = ResourceType::Serialized;
        row.value = Some(r#"{"max": 10}"#.to_string());
        assert_eq!(
            row.decode(),
            ResourceValue::Json(serde_json::json!({"max": 10}))
        );
    }

    #[test]
    fn test_decode_corrupt_serialized_value_degrades_to_empty() {
        let mut row = ResourceRow::new_text("Broken", "", "Resources", "");
        row.resource_type = ResourceType::Serialized;
        row.value = Some("{not json".to_string());
        assert_eq!(row.decode(), ResourceValue::Text(String::new()));
    }

    #[test]
    fn test_file_descriptor_parse() {
        let d = FileDescriptor::parse("style.css;text;utf-8").unwrap();
        assert_eq!(d.file_name, "style.css");
        assert_eq!(d.kind, FileKind::Text);
        assert_eq!(d.encoding.as_deref(), Some("utf-8"));

        assert!(FileDescriptor::parse("name-only").is_err());
        assert!(FileDescriptor::parse(";text").is_err());
    }

    #[test]
    fn test_upload_classification() {
        assert_eq!(FileDescriptor::for_upload("a.html").kind, FileKind::Text);
        assert_eq!(FileDescriptor::for_upload("a.wav").kind, FileKind::Binary);
    }

    #[test]
    fn test_listing_filter() {
        assert!(ResourceListingFilter::LocalOnly.matches("admin/index.aspx"));
        assert!(!ResourceListingFilter::LocalOnly.matches("Resources"));
        assert!(ResourceListingFilter::GlobalOnly.matches("Resources"));
        assert!(ResourceListingFilter::All.matches("anything"));
    }
}
