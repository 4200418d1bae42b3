//! Royal Mail AddressNow postcode lookup client.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use ukaddr_core::{ClassifiedQuery, Coordinates};

use super::heuristics::{determine_building_type, extract_sub_building};
use super::types::{PafAddress, PafSource};
use crate::error::ProviderError;
use crate::http::{join_path, lenient_f64, non_blank, null_as_default, parse_base_url, send_json};

const PROVIDER: &str = "royal-mail";
const DEFAULT_BASE_URL: &str = "https://api.royalmail.net/addressnow/v1/";

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    postcode: &'a str,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    addresses: Vec<RoyalMailAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoyalMailAddress {
    #[serde(deserialize_with = "null_as_default")]
    pub line1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub line2: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub county: String,
    pub latitude: Option<serde_json::Value>,
    pub longitude: Option<serde_json::Value>,
}

/// Client for the Royal Mail AddressNow API (bearer-token auth, JSON POST).
pub struct RoyalMailClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl RoyalMailClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingCredential`] when `api_key` is blank.
    pub fn new(client: Client, api_key: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(client, api_key, DEFAULT_BASE_URL)
    }

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
            credential: "ROYAL_MAIL_API_KEY",
        })?;
        Ok(Self {
            client,
            api_key,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Looks up addresses for a postcode. Free-text queries yield no results.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnexpectedStatus`], [`ProviderError::Http`] or
    /// [`ProviderError::Deserialize`].
    pub async fn search(
        &self,
        query: &ClassifiedQuery,
        limit: u32,
    ) -> Result<Vec<PafAddress>, ProviderError> {
        if !query.is_postcode() {
            return Ok(vec![]);
        }

        let url = join_path(&self.base_url, "addresses")?;
        let request = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&LookupRequest {
                postcode: &query.canonical,
                limit,
            });
        let body: LookupResponse = send_json(PROVIDER, "addresses", request).await?;

        Ok(body
            .addresses
            .into_iter()
            .enumerate()
            .map(|(i, addr)| convert_address(addr, &query.canonical, i))
            .collect())
    }
}

fn convert_address(addr: RoyalMailAddress, postcode: &str, index: usize) -> PafAddress {
    let coordinates = match (
        lenient_f64(addr.latitude.as_ref()),
        lenient_f64(addr.longitude.as_ref()),
    ) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    };
    let compact: String = postcode.split_whitespace().collect();

    PafAddress {
        id: format!("royalmail-{compact}-{index}"),
        building_type: determine_building_type(&addr.line1, &addr.line2),
        sub_building: extract_sub_building(&addr.line1, &addr.line2),
        line1: addr.line1.trim().to_string(),
        line2: non_blank(&addr.line2),
        line3: None,
        city: addr.city.trim().to_string(),
        county: non_blank(&addr.county),
        postcode: Some(postcode.to_string()),
        coordinates,
        confidence: PafSource::RoyalMail.confidence(),
        source: PafSource::RoyalMail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_fields_do_not_reject_the_response() {
        let body: LookupResponse = serde_json::from_value(serde_json::json!({
            "addresses": [
                {
                    "line1": "3 Barrack Street",
                    "line2": null,
                    "city": "Hamilton",
                    "county": null,
                    "latitude": "55.7772",
                    "longitude": "-4.039"
                }
            ]
        }))
        .unwrap();

        let paf = convert_address(
            body.addresses.into_iter().next().unwrap(),
            "ML3 0HS",
            0,
        );
        assert_eq!(paf.id, "royalmail-ML30HS-0");
        assert_eq!(paf.line1, "3 Barrack Street");
        assert!(paf.line2.is_none());
        assert!(paf.county.is_none());
        assert_eq!(paf.city, "Hamilton");
        assert!(paf.coordinates.is_some());
    }

    #[test]
    fn missing_addresses_key_is_empty() {
        let body: LookupResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(body.addresses.is_empty());
    }
}
