//! Locale tag helpers.
//!
//! Locale ids are IETF language tags stored lowercase; the empty string is
//! the invariant locale. Validation here is syntactic only: a tag of the
//! right shape is accepted whether or not a real language is assigned to it,
//! which is the right trade-off for operator-entered data.

/// True when `tag` is the invariant locale or a syntactically valid IETF
/// language tag: a 2–8 letter primary subtag followed by `-`-separated
/// alphanumeric subtags of length 1–8.
pub fn is_valid_locale(tag: &str) -> bool {
    if tag.is_empty() {
        return true;
    }
    let mut subtags = tag.split('-');
    let primary = match subtags.next() {
        Some(p) => p,
        None => return false,
    };
    if !(2..=8).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    subtags.all(|s| (1..=8).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Lowercases a tag for storage and comparison. Locale matching is
/// case-insensitive per BCP 47; normalizing once at the boundary keeps every
/// later comparison a plain string equality.
pub fn normalize(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

/// The language-only prefix of a regional tag: `de-de` → `de`. Returns
/// `None` when the tag has no subtag separator.
pub fn language_prefix(tag: &str) -> Option<&str> {
    let (prefix, _) = tag.split_once('-')?;
    Some(prefix)
}

/// The ordered fallback chain for a requested locale: exact tag, language
/// prefix (when the tag is regional), invariant. Tiers that collapse into
/// each other are deduplicated, so `de` yields `["de", ""]` and the
/// invariant request yields `[""]`.
pub fn fallback_chain(tag: &str) -> Vec<String> {
    let tag = normalize(tag);
    let mut chain = Vec::with_capacity(3);
    if !tag.is_empty() {
        chain.push(tag.clone());
        if let Some(prefix) = language_prefix(&tag) {
            chain.push(prefix.to_string());
        }
    }
    chain.push(String::new());
    chain
}

/// English display name for a locale tag, for admin listings. Covers the
/// primary subtags that show up in practice; anything else echoes the tag.
pub fn display_name(tag: &str) -> String {
    if tag.is_empty() {
        return "Invariant".to_string();
    }
    let tag = normalize(tag);
    let language = language_prefix(&tag).unwrap_or(&tag);
    let name = match language {
        "ar" => "Arabic",
        "cs" => "Czech",
        "da" => "Danish",
        "de" => "German",
        "el" => "Greek",
        "en" => "English",
        "es" => "Spanish",
        "fi" => "Finnish",
        "fr" => "French",
        "he" => "Hebrew",
        "hi" => "Hindi",
        "it" => "Italian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "nl" => "Dutch",
        "no" | "nb" | "nn" => "Norwegian",
        "pl" => "Polish",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "sv" => "Swedish",
        "tr" => "Turkish",
        "uk" => "Ukrainian",
        "zh" => "Chinese",
        _ => return tag.to_string(),
    };
    if tag == language {
        name.to_string()
    } else {
        format!("{name} ({tag})")
    }
}

/// Right-to-left scripts, keyed by primary subtag.
pub fn is_rtl(tag: &str) -> bool {
    let tag = normalize(tag);
    let language = language_prefix(&tag).unwrap_or(&tag);
    matches!(language, "ar" | "fa" | "he" | "ps" | "ur" | "yi")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_locales() {
        assert!(is_valid_locale(""));
        assert!(is_valid_locale("de"));
        assert!(is_valid_locale("de-de"));
        assert!(is_valid_locale("zh-hant-tw"));
        assert!(is_valid_locale("es-419"));
    }

    #[test]
    fn test_invalid_locales() {
        assert!(!is_valid_locale("d"));
        assert!(!is_valid_locale("123"));
        assert!(!is_valid_locale("de-"));
        assert!(!is_valid_locale("de--at"));
        assert!(!is_valid_locale("toolonglanguage"));
        assert!(!is_valid_locale("de_DE"));
    }

    #[test]
    fn test_language_prefix() {
        assert_eq!(language_prefix("de-de"), Some("de"));
        assert_eq!(language_prefix("de"), None);
        assert_eq!(language_prefix(""), None);
    }

    #[test]
    fn test_fallback_chain() {
        assert_eq!(fallback_chain("de-DE"), vec!["de-de", "de", ""]);
        assert_eq!(fallback_chain("de"), vec!["de", ""]);
        assert_eq!(fallback_chain(""), vec![""]);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(""), "Invariant");
        assert_eq!(display_name("de"), "German");
        assert_eq!(display_name("de-AT"), "German (de-at)");
        assert_eq!(display_name("tlh"), "tlh");
    }

    #[test]
    fn test_rtl() {
        assert!(is_rtl("ar-eg"));
        assert!(is_rtl("he"));
        assert!(!is_rtl("de-de"));
    }
}
