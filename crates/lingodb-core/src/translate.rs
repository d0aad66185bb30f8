//! Machine-translation assist via external web services.
//!
//! These services change formats and fail; every outbound call carries the
//! configured timeout and every failure is a recoverable
//! [`LingoError::Translation`] with a message, never a crash of the admin
//! request. Missing provider credentials yield an empty result so the
//! editor can show "not configured" instead of an error.

use crate::error::{LingoError, Result};
use lingodb_commons::{locale, LocalizationConfig};
use std::time::Duration;

const GOOGLE_FREE_URL: &str = "https://translate.googleapis.com/translate_a/single";
const GOOGLE_API_URL: &str = "https://www.googleapis.com/language/translate/v2";
const BING_API_URL: &str = "https://api.cognitive.microsofttranslator.com/translate";

/// Client for the supported translation providers.
pub struct TranslationService {
    config: LocalizationConfig,
    client: reqwest::Client,
}

impl TranslationService {
    pub fn new(config: LocalizationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.translator_timeout_secs.max(1)))
            .build()
            .map_err(|e| LingoError::Translation(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Translates `text` between two locales using the named service
    /// (`google`, `googleapi` or `bing`; empty defaults to `google`).
    ///
    /// Locales are reduced to their primary subtag since none of the
    /// services accept regional variants.
    pub async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
        service: &str,
    ) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let from = primary_subtag(from);
        let to = primary_subtag(to);

        match service.to_ascii_lowercase().as_str() {
            "" | "google" => self.translate_google(text, &from, &to).await,
            "googleapi" => self.translate_google_api(text, &from, &to).await,
            "bing" => self.translate_bing(text, &from, &to).await,
            other => Err(LingoError::InvalidInput(format!(
                "unknown translation service: {other:?}"
            ))),
        }
    }

    /// Google's free gtx endpoint. The payload is a nested array:
    /// `[[["Hallo Welt","Hello world",...]],...]`.
    async fn translate_google(&self, text: &str, from: &str, to: &str) -> Result<String> {
        let response = self
            .client
            .get(GOOGLE_FREE_URL)
            .query(&[
                ("client", "gtx"),
                ("sl", from),
                ("tl", to),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(connection_failed)?;
        let json: serde_json::Value = response
            .error_for_status()
            .map_err(connection_failed)?
            .json()
            .await
            .map_err(connection_failed)?;

        let result = json
            .get(0)
            .and_then(|v| v.get(0))
            .and_then(|v| v.get(0))
            .and_then(|v| v.as_str())
            .ok_or_else(|| LingoError::Translation("invalid translation result".to_string()))?;
        Ok(html_decode(result))
    }

    /// Google Cloud Translation v2, keyed.
    async fn translate_google_api(&self, text: &str, from: &str, to: &str) -> Result<String> {
        let Some(api_key) = self
            .config
            .google_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
        else {
            log::warn!("google api translation requested but no api key is configured");
            return Ok(String::new());
        };

        let response = self
            .client
            .get(GOOGLE_API_URL)
            .query(&[
                ("key", api_key),
                ("source", from),
                ("target", to),
                ("q", text),
            ])
            .send()
            .await
            .map_err(connection_failed)?;
        let json: serde_json::Value = response
            .error_for_status()
            .map_err(connection_failed)?
            .json()
            .await
            .map_err(connection_failed)?;

        let result = json
            .pointer("/data/translations/0/translatedText")
            .and_then(|v| v.as_str())
            .ok_or_else(|| LingoError::Translation("invalid translation result".to_string()))?;
        Ok(html_decode(result))
    }

    /// Azure Translator v3. The legacy datamarket OAuth flow is gone; the
    /// service authenticates with a subscription key (stored in
    /// `bing_client_secret`) and an optional region (`bing_client_id`).
    async fn translate_bing(&self, text: &str, from: &str, to: &str) -> Result<String> {
        let Some(key) = self
            .config
            .bing_client_secret
            .as_deref()
            .filter(|k| !k.is_empty())
        else {
            log::warn!("bing translation requested but no subscription key is configured");
            return Ok(String::new());
        };

        let mut request = self
            .client
            .post(BING_API_URL)
            .query(&[("api-version", "3.0"), ("from", from), ("to", to)])
            .header("Ocp-Apim-Subscription-Key", key)
            .json(&serde_json::json!([{ "Text": text }]));
        if let Some(region) = self.config.bing_client_id.as_deref().filter(|r| !r.is_empty()) {
            request = request.header("Ocp-Apim-Subscription-Region", region);
        }

        let response = request.send().await.map_err(connection_failed)?;
        let json: serde_json::Value = response
            .error_for_status()
            .map_err(connection_failed)?
            .json()
            .await
            .map_err(connection_failed)?;

        let result = json
            .pointer("/0/translations/0/text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| LingoError::Translation("invalid translation result".to_string()))?;
        Ok(result.to_string())
    }
}

/// Reduces a locale to its primary subtag: the services do not accept
/// regional variants (`en-us` becomes `en`).
fn primary_subtag(tag: &str) -> String {
    let tag = locale::normalize(tag);
    locale::language_prefix(&tag)
        .map(str::to_string)
        .unwrap_or(tag)
}

fn connection_failed(err: reqwest::Error) -> LingoError {
    if err.is_timeout() {
        LingoError::Translation("translation request timed out".to_string())
    } else {
        LingoError::Translation(format!("connection failed: {err}"))
    }
}

/// Undoes the HTML entity escaping the translation endpoints apply.
fn html_decode(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(config: LocalizationConfig) -> TranslationService {
        TranslationService::new(config).unwrap()
    }

    #[test]
    fn test_primary_subtag() {
        assert_eq!(primary_subtag("en-US"), "en");
        assert_eq!(primary_subtag("de"), "de");
    }

    #[test]
    fn test_html_decode() {
        assert_eq!(html_decode("a &lt;b&gt; &amp;&#39;c&#39;"), "a <b> &'c'");
    }

    #[tokio::test]
    async fn test_empty_text_short_circuits() {
        let service = service(LocalizationConfig::default());
        assert_eq!(service.translate("", "en", "de", "google").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_missing_credentials_yield_empty_result() {
        let service = service(LocalizationConfig::default());
        assert_eq!(
            service.translate("hello", "en", "de", "googleapi").await.unwrap(),
            ""
        );
        assert_eq!(
            service.translate("hello", "en", "de", "bing").await.unwrap(),
            ""
        );
    }

    #[tokio::test]
    async fn test_unknown_service_is_invalid_input() {
        let service = service(LocalizationConfig::default());
        assert!(matches!(
            service.translate("hello", "en", "de", "yandex").await,
            Err(LingoError::InvalidInput(_))
        ));
    }
}
