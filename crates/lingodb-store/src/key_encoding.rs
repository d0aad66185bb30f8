//! Key encoding for resource rows.
//!
//! A row key is the NUL-separated concatenation
//! `{resource_set}\0{resource_id}\0{locale_id}`. Because `\0` sorts below
//! every other byte, an ascending scan over a set prefix yields rows ordered
//! by `(resource_id, locale_id)`, the order the fallback-chain query and
//! the uniqueness invariant are built on. Key components therefore must not
//! contain NUL bytes; [`validate_component`] rejects them at the store
//! boundary.

use crate::storage::{Result, StoreError};

const SEP: u8 = 0;

/// Encodes a full row key: `{resource_set}\0{resource_id}\0{locale_id}`.
pub fn row_key(resource_set: &str, resource_id: &str, locale_id: &str) -> Vec<u8> {
    let mut key =
        Vec::with_capacity(resource_set.len() + resource_id.len() + locale_id.len() + 2);
    key.extend_from_slice(resource_set.as_bytes());
    key.push(SEP);
    key.extend_from_slice(resource_id.as_bytes());
    key.push(SEP);
    key.extend_from_slice(locale_id.as_bytes());
    key
}

/// Prefix matching every row of a resource set.
pub fn set_prefix(resource_set: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(resource_set.len() + 1);
    key.extend_from_slice(resource_set.as_bytes());
    key.push(SEP);
    key
}

/// Prefix matching every locale variant of one resource id within a set.
pub fn set_id_prefix(resource_set: &str, resource_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(resource_set.len() + resource_id.len() + 2);
    key.extend_from_slice(resource_set.as_bytes());
    key.push(SEP);
    key.extend_from_slice(resource_id.as_bytes());
    key.push(SEP);
    key
}

/// Parses a row key into `(resource_set, resource_id, locale_id)`.
pub fn parse_row_key(key: &[u8]) -> Result<(String, String, String)> {
    let mut parts = key.split(|b| *b == SEP);
    let set = parts.next();
    let id = parts.next();
    let locale = parts.next();
    match (set, id, locale, parts.next()) {
        (Some(set), Some(id), Some(locale), None) => Ok((
            decode_component(set)?,
            decode_component(id)?,
            decode_component(locale)?,
        )),
        _ => Err(StoreError::Serialization(format!(
            "invalid row key: {} separators expected 2",
            key.iter().filter(|b| **b == SEP).count()
        ))),
    }
}

fn decode_component(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| StoreError::Serialization(format!("row key is not UTF-8: {}", e)))
}

/// Rejects key components that would corrupt the encoding.
pub fn validate_component(name: &str, value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(StoreError::InvalidInput(format!(
            "{name} must not contain NUL bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_key_round_trip() {
        let key = row_key("Resources", "Today", "de-de");
        let (set, id, locale) = parse_row_key(&key).unwrap();
        assert_eq!(set, "Resources");
        assert_eq!(id, "Today");
        assert_eq!(locale, "de-de");
    }

    #[test]
    fn test_invariant_locale_key() {
        let key = row_key("Resources", "Today", "");
        let (_, _, locale) = parse_row_key(&key).unwrap();
        assert_eq!(locale, "");
    }

    #[test]
    fn test_prefixes_nest() {
        let key = row_key("Resources", "Today", "de");
        assert!(key.starts_with(&set_prefix("Resources")));
        assert!(key.starts_with(&set_id_prefix("Resources", "Today")));
        // A set whose name extends another must not match its prefix
        assert!(!row_key("Resources2", "Today", "de").starts_with(&set_prefix("Resources")));
    }

    #[test]
    fn test_scan_order_is_id_then_locale() {
        // Ascending byte order over keys gives resource_id then locale_id,
        // with the invariant locale first within an id group.
        let mut keys = vec![
            row_key("S", "b", ""),
            row_key("S", "a", "de-de"),
            row_key("S", "a", ""),
            row_key("S", "a", "de"),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                row_key("S", "a", ""),
                row_key("S", "a", "de"),
                row_key("S", "a", "de-de"),
                row_key("S", "b", ""),
            ]
        );
    }

    #[test]
    fn test_invalid_keys() {
        assert!(parse_row_key(b"no-separators").is_err());
        assert!(validate_component("resource id", "bad\0id").is_err());
        assert!(validate_component("resource id", "fine.id").is_ok());
    }
}
