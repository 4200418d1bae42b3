//! Keyless postcode autocomplete and lookup via postcodes.io.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use ukaddr_core::{format_uk_postcode, Coordinates, MIN_QUERY_LEN};

use crate::error::ProviderError;
use crate::http::{join_path, null_as_default, parse_base_url, send_json};

const PROVIDER: &str = "postcodes-io";
const DEFAULT_BASE_URL: &str = "https://api.postcodes.io/";

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    result: Vec<String>,
}

/// Administrative data for one postcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostcodeLookup {
    pub postcode: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub admin_district: Option<String>,
    #[serde(default)]
    pub admin_county: Option<String>,
    #[serde(default)]
    pub admin_ward: Option<String>,
    #[serde(default)]
    pub parish: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl PostcodeLookup {
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates {
            lat: self.latitude?,
            lng: self.longitude?,
        })
    }
}

pub struct PostcodesIoClient {
    client: Client,
    base_url: Url,
}

impl PostcodesIoClient {
    /// # Errors
    ///
    /// Never fails for the built-in base URL; the `Result` mirrors
    /// [`PostcodesIoClient::with_base_url`].
    pub fn new(client: Client) -> Result<Self, ProviderError> {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(client: Client, base_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Completes a partial postcode. Inputs shorter than three characters
    /// return an empty list without a request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnexpectedStatus`], [`ProviderError::Http`] or
    /// [`ProviderError::Deserialize`].
    pub async fn autocomplete(&self, partial: &str) -> Result<Vec<String>, ProviderError> {
        let partial = partial.trim();
        if partial.chars().count() < MIN_QUERY_LEN {
            return Ok(vec![]);
        }
        let encoded = utf8_percent_encode(partial, NON_ALPHANUMERIC).to_string();
        let url = join_path(&self.base_url, &format!("postcodes/{encoded}/autocomplete"))?;

        let body: AutocompleteEnvelope =
            send_json(PROVIDER, "postcodes/autocomplete", self.client.get(url)).await?;
        Ok(body.result)
    }

    /// Looks up a full postcode; `Ok(None)` when postcodes.io does not know it.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnexpectedStatus`] for statuses other than
    /// 2xx and 404, [`ProviderError::Http`] or [`ProviderError::Deserialize`].
    pub async fn lookup(&self, postcode: &str) -> Result<Option<PostcodeLookup>, ProviderError> {
        let canonical = format_uk_postcode(postcode);
        let encoded = utf8_percent_encode(&canonical, NON_ALPHANUMERIC).to_string();
        let url = join_path(&self.base_url, &format!("postcodes/{encoded}"))?;

        match send_json::<Envelope<PostcodeLookup>>(PROVIDER, "postcodes", self.client.get(url))
            .await
        {
            Ok(body) => Ok(body.result),
            Err(ProviderError::UnexpectedStatus { status: 404, .. }) => {
                tracing::debug!(postcode = %canonical, "postcode not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_need_both_axes() {
        let mut lookup: PostcodeLookup = serde_json::from_value(serde_json::json!({
            "postcode": "ML3 0HS",
            "admin_district": "South Lanarkshire",
            "latitude": 55.7772,
            "longitude": -4.039
        }))
        .unwrap();
        assert!(lookup.coordinates().is_some());
        lookup.longitude = None;
        assert!(lookup.coordinates().is_none());
    }

    #[test]
    fn envelope_result_may_be_null_or_missing() {
        let null: Envelope<PostcodeLookup> =
            serde_json::from_value(serde_json::json!({ "status": 200, "result": null })).unwrap();
        assert!(null.result.is_none());

        let missing: Envelope<PostcodeLookup> =
            serde_json::from_value(serde_json::json!({ "status": 200 })).unwrap();
        assert!(missing.result.is_none());

        let found: Envelope<PostcodeLookup> = serde_json::from_value(serde_json::json!({
            "result": { "postcode": "SW1A 1AA", "country": "England" }
        }))
        .unwrap();
        assert_eq!(found.result.map(|r| r.postcode).as_deref(), Some("SW1A 1AA"));
    }
}
