//! Shared HTTP plumbing for the provider clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::ProviderError;

/// Builds the `reqwest::Client` shared by every provider.
///
/// # Errors
///
/// Returns [`ProviderError::Http`] if the client cannot be constructed
/// (e.g., invalid TLS config).
pub fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(5))
        .user_agent(user_agent)
        .build()
        .map_err(|e| ProviderError::http("http-client", e))
}

/// Parses a base URL, normalising it to end with exactly one slash so
/// relative joins append to the path instead of replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ProviderError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Joins a relative path onto a normalised base URL.
pub(crate) fn join_path(base_url: &Url, path: &str) -> Result<Url, ProviderError> {
    base_url
        .join(path)
        .map_err(|e| ProviderError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })
}

/// Sends a request, asserts a 2xx status, and decodes the body as `T`.
///
/// # Errors
///
/// - [`ProviderError::Http`] on network failure.
/// - [`ProviderError::UnexpectedStatus`] on any non-2xx status.
/// - [`ProviderError::Deserialize`] if the body does not match `T`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &'static str,
    context: &str,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| ProviderError::http(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::UnexpectedStatus {
            provider,
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::http(provider, e))?;
    serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

/// Trims a string and returns `None` when nothing is left.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reads a coordinate that may arrive as a JSON number or numeric string.
pub(crate) fn lenient_f64(value: Option<&serde_json::Value>) -> Option<f64> {
    let value = value?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|v| v.is_finite())
}

/// Deserializes `null` as `T::default()`; combine with `#[serde(default)]`
/// so missing and null fields behave the same.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a string or a number and yields its text form.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => non_blank(&s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_base_url_appends_single_slash() {
        let url = parse_base_url("https://api.mapbox.com//").unwrap();
        assert_eq!(url.as_str(), "https://api.mapbox.com/");
    }

    #[test]
    fn parse_base_url_rejects_garbage() {
        let err = parse_base_url("not a url").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn join_path_keeps_base_path_prefix() {
        let base = parse_base_url("http://127.0.0.1:9000/mock").unwrap();
        let url = join_path(&base, "v1/postcodes/ML3%200HS").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/mock/v1/postcodes/ML3%200HS");
    }

    #[test]
    fn lenient_f64_reads_numbers_and_strings() {
        let num = serde_json::json!(55.77);
        let text = serde_json::json!(" -4.03 ");
        let junk = serde_json::json!("north");
        assert_eq!(lenient_f64(Some(&num)), Some(55.77));
        assert_eq!(lenient_f64(Some(&text)), Some(-4.03));
        assert_eq!(lenient_f64(Some(&junk)), None);
        assert_eq!(lenient_f64(None), None);
    }

    #[test]
    fn non_blank_filters_whitespace() {
        assert_eq!(non_blank("  "), None);
        assert_eq!(non_blank(" Flat 4 "), Some("Flat 4".to_string()));
    }

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "string_or_number")]
        number: Option<String>,
    }

    #[test]
    fn null_and_missing_fields_default() {
        let probe: Probe = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(probe.items.is_empty());
        assert!(probe.number.is_none());
    }

    #[test]
    fn numeric_house_number_becomes_text() {
        let probe: Probe = serde_json::from_str(r#"{"number": 221}"#).unwrap();
        assert_eq!(probe.number.as_deref(), Some("221"));
    }
}
