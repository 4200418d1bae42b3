//! Loqate Capture Interactive client (Find v1.1 then Retrieve v1.2).

use reqwest::{Client, Url};
use serde::Deserialize;
use ukaddr_core::{extract_postcode, ClassifiedQuery, Coordinates};

use super::heuristics::{determine_building_type, extract_sub_building};
use super::types::{PafAddress, PafSource};
use crate::error::ProviderError;
use crate::http::{
    join_path, lenient_f64, non_blank, null_as_default, parse_base_url, send_json,
    string_or_number,
};

const PROVIDER: &str = "loqate";
const DEFAULT_BASE_URL: &str = "https://api.addressy.com/";
const FIND_PATH: &str = "Capture/Interactive/Find/v1.1/json3.ws";
const RETRIEVE_PATH: &str = "Capture/Interactive/Retrieve/v1.2/json3.ws";

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ItemsEnvelope<T> {
    #[serde(rename = "Items", default = "Vec::new", deserialize_with = "null_as_default")]
    items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoqateFindItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub r#type: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub text: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoqateRetrieveItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub line1: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub line2: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub line3: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub city: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub province: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub label: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub description: Option<String>,
    pub latitude: Option<serde_json::Value>,
    pub longitude: Option<serde_json::Value>,
    #[serde(deserialize_with = "string_or_number")]
    pub error: Option<String>,
}

/// Client for the Loqate (formerly PCA Predict / Addressy) capture API.
pub struct LoqateClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl LoqateClient {
    /// Creates a client pointed at the production Loqate API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingCredential`] when `api_key` is blank.
    pub fn new(client: Client, api_key: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(client, api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingCredential`] when `api_key` is blank,
    /// or [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        client: Client,
        api_key: &str,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let api_key = non_blank(api_key).ok_or(ProviderError::MissingCredential {
            provider: PROVIDER,
            credential: "LOQATE_API_KEY",
        })?;
        Ok(Self {
            client,
            api_key,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Resolves a query in two steps: Find, then Retrieve.
    ///
    /// For a postcode the first Find match is retrieved and every address it
    /// expands to is returned. For free text each Find match (up to `limit`)
    /// is retrieved separately; a failed retrieve skips that match only.
    ///
    /// # Errors
    ///
    /// Returns any transport, status or deserialization error from the Find
    /// step, or [`ProviderError::ApiStatus`] when Loqate reports an error item.
    pub async fn search(
        &self,
        query: &ClassifiedQuery,
        limit: u32,
    ) -> Result<Vec<PafAddress>, ProviderError> {
        let find_limit = if query.is_postcode() { 10 } else { limit };
        let found = self.find(&query.canonical, find_limit).await?;

        if query.is_postcode() {
            let Some(id) = found.first().and_then(|item| item.id.clone()) else {
                return Ok(vec![]);
            };
            let items = self.retrieve(&id).await?;
            return Ok(items
                .iter()
                .enumerate()
                .map(|(index, item)| convert_item(item, Some(&query.canonical), index))
                .collect());
        }

        let mut results = Vec::new();
        for (index, item) in found.iter().take(limit as usize).enumerate() {
            let Some(id) = item.id.as_deref() else {
                continue;
            };
            match self.retrieve(id).await {
                Ok(items) => {
                    if let Some(first) = items.first() {
                        results.push(convert_item(first, None, index));
                    }
                }
                Err(e) => {
                    tracing::warn!(provider = PROVIDER, id, error = %e, "Loqate retrieve failed");
                }
            }
        }
        Ok(results)
    }

    async fn find(&self, text: &str, limit: u32) -> Result<Vec<LoqateFindItem>, ProviderError> {
        let mut url = join_path(&self.base_url, FIND_PATH)?;
        url.query_pairs_mut()
            .append_pair("Key", &self.api_key)
            .append_pair("Text", text)
            .append_pair("Country", "GB")
            .append_pair("Limit", &limit.to_string());

        let envelope: ItemsEnvelope<LoqateFindItem> =
            send_json(PROVIDER, "Find/v1.1", self.client.get(url)).await?;
        if let Some(err) = envelope.items.iter().find(|i| i.error.is_some()) {
            return Err(api_error(err.error.as_deref(), err.description.as_deref()));
        }
        Ok(envelope.items)
    }

    async fn retrieve(&self, id: &str) -> Result<Vec<LoqateRetrieveItem>, ProviderError> {
        let mut url = join_path(&self.base_url, RETRIEVE_PATH)?;
        url.query_pairs_mut()
            .append_pair("Key", &self.api_key)
            .append_pair("Id", id);

        let envelope: ItemsEnvelope<LoqateRetrieveItem> =
            send_json(PROVIDER, "Retrieve/v1.2", self.client.get(url)).await?;
        if let Some(err) = envelope.items.iter().find(|i| i.error.is_some()) {
            return Err(api_error(err.error.as_deref(), err.description.as_deref()));
        }
        Ok(envelope.items)
    }
}

fn api_error(code: Option<&str>, description: Option<&str>) -> ProviderError {
    ProviderError::ApiStatus {
        provider: PROVIDER,
        status: format!(
            "error {}: {}",
            code.unwrap_or("?"),
            description.unwrap_or("unknown error")
        ),
    }
}

/// Builds a [`PafAddress`] from a Retrieve item, preferring the structured
/// `Line1`/`City`/`PostalCode` fields and falling back to splitting the
/// comma-separated label.
fn convert_item(item: &LoqateRetrieveItem, postcode: Option<&str>, index: usize) -> PafAddress {
    let label = item
        .label
        .clone()
        .or_else(|| item.description.clone())
        .unwrap_or_default()
        .replace('\n', ", ");

    let (line1, line2, line3, city, county) = if let Some(line1) = item.line1.clone() {
        (
            line1,
            item.line2.clone(),
            item.line3.clone(),
            item.city.clone().unwrap_or_default(),
            item.province.clone(),
        )
    } else {
        let parts: Vec<&str> = label.split(',').map(str::trim).collect();
        let from_end = |n: usize| {
            parts
                .len()
                .checked_sub(n)
                .and_then(|i| parts.get(i))
                .and_then(|s| non_blank(s))
        };
        (
            parts.first().copied().unwrap_or_default().to_string(),
            parts.get(1).and_then(|s| non_blank(s)),
            None,
            from_end(3).unwrap_or_default(),
            from_end(2),
        )
    };

    let postcode = item
        .postal_code
        .as_deref()
        .and_then(ukaddr_core::canonical_postcode)
        .or_else(|| postcode.map(str::to_string))
        .or_else(|| extract_postcode(&label));

    let coordinates = match (
        lenient_f64(item.latitude.as_ref()),
        lenient_f64(item.longitude.as_ref()),
    ) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    };

    let line2_text = line2.clone().unwrap_or_default();
    PafAddress {
        id: format!(
            "loqate-{}",
            item.id.clone().unwrap_or_else(|| index.to_string())
        ),
        building_type: determine_building_type(&line1, &line2_text),
        sub_building: extract_sub_building(&line1, &line2_text),
        line1,
        line2,
        line3,
        city,
        county,
        postcode,
        coordinates,
        confidence: PafSource::Loqate.confidence(),
        source: PafSource::Loqate,
    }
}
