//! JavaScript object serialization of resolved resource sets.
//!
//! The output is a script body assigning an object literal to a caller-named
//! variable:
//!
//! ```javascript
//! localRes = {
//!     "BackupFailed": "Backup was not completed",
//!     "Loading": "Loading",
//!     "dbRes": function dbRes(resId) { return localRes[resId] || resId; }
//! };
//! ```
//!
//! Keys are munged into identifier-friendly names (dots become underscores,
//! spaced keys are camel-cased) and values are escaped as JSON string
//! literals with `<` and `>` additionally escaped, since the script may be
//! embedded in HTML.

use std::collections::BTreeMap;

/// Validates a caller-supplied variable name before it is embedded into
/// script output. Anything outside word characters, `$`, `@` and `.` is a
/// script-injection vector and is rejected.
pub fn is_valid_var_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '@' | '.'))
}

/// Serializes a resolved dictionary to the script body. Keys iterate in
/// sorted order so output is deterministic; empty keys get synthetic
/// `__idN` names.
pub fn serialize_resource_dictionary(
    resources: &BTreeMap<String, String>,
    var_name: &str,
) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(var_name);
    out.push_str(" = {\r\n");

    let mut anonymous_id_counter = 0usize;
    for (key, value) in resources {
        let key = if key.is_empty() {
            let key = format!("__id{anonymous_id_counter}");
            anonymous_id_counter += 1;
            key
        } else {
            munge_key(key)
        };
        out.push_str("\t\"");
        out.push_str(&key);
        out.push_str("\": ");
        out.push_str(&encode_js_string(value));
        out.push_str(",\r\n");
    }

    out.push_str(&format!(
        "\t\"dbRes\": function dbRes(resId) {{ return {var_name}[resId] || resId; }}\r\n}}\r\n"
    ));
    out
}

/// Turns a resource key into an identifier-friendly property name.
pub fn munge_key(key: &str) -> String {
    let key = key.replace('.', "_");
    if key.contains(' ') {
        to_camel_case(&key)
    } else {
        key
    }
}

/// Camel-cases a spaced key: `"Backup Failed"` becomes `"backupFailed"`.
fn to_camel_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, word) in text.split_whitespace().enumerate() {
        let mut chars = word.chars();
        let Some(first) = chars.next() else { continue };
        if i == 0 {
            out.extend(first.to_lowercase());
        } else {
            out.extend(first.to_uppercase());
        }
        out.push_str(chars.as_str());
    }
    out
}

/// Encodes a string as a quoted JavaScript string literal. JSON escaping
/// rules, plus `<` and `>` as `\uXXXX` to keep embedded-in-HTML script
/// bodies inert.
pub fn encode_js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 32 || c == '<' || c == '>' => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_name_validation() {
        assert!(is_valid_var_name("localRes"));
        assert!(is_valid_var_name("global.resources"));
        assert!(is_valid_var_name("$res"));
        assert!(!is_valid_var_name(""));
        assert!(!is_valid_var_name("x;alert(1)"));
        assert!(!is_valid_var_name("a b"));
    }

    #[test]
    fn test_encode_js_string_escapes() {
        assert_eq!(
            encode_js_string("Hello \"Rick\"!\r\nRock on"),
            "\"Hello \\\"Rick\\\"!\\r\\nRock on\""
        );
        assert_eq!(encode_js_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(encode_js_string("<script>"), "\"\\u003Cscript\\u003E\"");
        assert_eq!(encode_js_string("tab\there"), "\"tab\\there\"");
        assert_eq!(encode_js_string("\u{1}"), "\"\\u0001\"");
    }

    #[test]
    fn test_key_munging() {
        assert_eq!(munge_key("lblName.Text"), "lblName_Text");
        assert_eq!(munge_key("Backup Failed"), "backupFailed");
        assert_eq!(munge_key("Plain"), "Plain");
    }

    #[test]
    fn test_serialized_dictionary_shape() {
        let mut resources = BTreeMap::new();
        resources.insert("Loading".to_string(), "Loading...".to_string());
        resources.insert("Backup Failed".to_string(), "No backup".to_string());

        let script = serialize_resource_dictionary(&resources, "localRes");
        assert!(script.starts_with("localRes = {\r\n"));
        assert!(script.contains("\t\"backupFailed\": \"No backup\",\r\n"));
        assert!(script.contains("\t\"Loading\": \"Loading...\",\r\n"));
        assert!(script.contains(
            "\"dbRes\": function dbRes(resId) { return localRes[resId] || resId; }"
        ));
        assert!(script.trim_end().ends_with('}'));
    }

    #[test]
    fn test_empty_keys_get_synthetic_names() {
        let mut resources = BTreeMap::new();
        resources.insert(String::new(), "anonymous".to_string());
        let script = serialize_resource_dictionary(&resources, "r");
        assert!(script.contains("\t\"__id0\": \"anonymous\",\r\n"));
    }
}
