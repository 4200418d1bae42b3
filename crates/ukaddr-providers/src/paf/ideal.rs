//! Ideal Postcodes postcode lookup client.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use serde::Deserialize;
use ukaddr_core::{ClassifiedQuery, Coordinates};

use super::heuristics::{determine_building_type, extract_sub_building};
use super::types::{PafAddress, PafSource};
use crate::error::ProviderError;
use crate::http::{join_path, lenient_f64, non_blank, null_as_default, parse_base_url, send_json};

const PROVIDER: &str = "ideal-postcodes";
const DEFAULT_BASE_URL: &str = "https://api.ideal-postcodes.co.uk/";

#[derive(Debug, Deserialize)]
struct IdealResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    result: Vec<IdealAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IdealAddress {
    #[serde(deserialize_with = "null_as_default")]
    pub line_1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub line_2: String,
    #[serde(deserialize_with = "null_as_default")]
    pub line_3: String,
    #[serde(deserialize_with = "null_as_default")]
    pub post_town: String,
    #[serde(deserialize_with = "null_as_default")]
    pub county: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postcode: String,
    pub latitude: Option<serde_json::Value>,
    pub longitude: Option<serde_json::Value>,
}

/// Client for the Ideal Postcodes PAF API. Only postcode lookups are
/// supported; free-text queries yield no results.
pub struct IdealPostcodesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl IdealPostcodesClient {
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
            credential: "IDEAL_POSTCODES_API_KEY",
        })?;
        Ok(Self {
            client,
            api_key,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Lists every delivery point for a postcode.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnexpectedStatus`] (Ideal Postcodes answers an
    /// unknown postcode with 404), [`ProviderError::Http`] or
    /// [`ProviderError::Deserialize`].
    pub async fn search(&self, query: &ClassifiedQuery) -> Result<Vec<PafAddress>, ProviderError> {
        if !query.is_postcode() {
            return Ok(vec![]);
        }

        let encoded = utf8_percent_encode(&query.canonical, NON_ALPHANUMERIC).to_string();
        let mut url = join_path(&self.base_url, &format!("v1/postcodes/{encoded}"))?;
        url.query_pairs_mut().append_pair("api_key", &self.api_key);

        let body: IdealResponse = send_json(PROVIDER, "v1/postcodes", self.client.get(url)).await?;
        let compact: String = query.canonical.split_whitespace().collect();

        Ok(body
            .result
            .into_iter()
            .enumerate()
            .map(|(i, addr)| convert_address(addr, &compact, &query.canonical, i))
            .collect())
    }
}

fn convert_address(addr: IdealAddress, compact: &str, postcode: &str, index: usize) -> PafAddress {
    let coordinates = match (
        lenient_f64(addr.latitude.as_ref()),
        lenient_f64(addr.longitude.as_ref()),
    ) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    };
    let postcode = ukaddr_core::canonical_postcode(&addr.postcode)
        .unwrap_or_else(|| postcode.to_string());

    PafAddress {
        id: format!("ideal-{compact}-{index}"),
        building_type: determine_building_type(&addr.line_1, &addr.line_2),
        sub_building: extract_sub_building(&addr.line_1, &addr.line_2),
        line1: addr.line_1.trim().to_string(),
        line2: non_blank(&addr.line_2),
        line3: non_blank(&addr.line_3),
        city: addr.post_town.trim().to_string(),
        county: non_blank(&addr.county),
        postcode: Some(postcode),
        coordinates,
        confidence: PafSource::IdealPostcodes.confidence(),
        source: PafSource::IdealPostcodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_result_row() {
        let addr: IdealAddress = serde_json::from_value(serde_json::json!({
            "line_1": "Flat 1",
            "line_2": "7 Barrack Street",
            "line_3": "",
            "post_town": "HAMILTON",
            "county": "Lanarkshire",
            "postcode": "ML3 0HS",
            "latitude": 55.7772,
            "longitude": -4.039
        }))
        .unwrap();
        let paf = convert_address(addr, "ML30HS", "ML3 0HS", 2);
        assert_eq!(paf.id, "ideal-ML30HS-2");
        assert_eq!(paf.line2.as_deref(), Some("7 Barrack Street"));
        assert!(paf.line3.is_none());
        assert_eq!(paf.city, "HAMILTON");
        assert_eq!(paf.sub_building.as_deref(), Some("Flat 1"));
        assert!(paf.coordinates.is_some());
        assert_eq!(paf.source, PafSource::IdealPostcodes);
    }

    #[test]
    fn null_fields_do_not_reject_the_response() {
        let body: IdealResponse = serde_json::from_value(serde_json::json!({
            "result": [
                {
                    "line_1": "3 Barrack Street",
                    "line_2": null,
                    "line_3": null,
                    "post_town": "HAMILTON",
                    "county": null,
                    "postcode": "ML3 0HS",
                    "latitude": null,
                    "longitude": null
                },
                { "line_1": "5 Barrack Street", "post_town": "HAMILTON" }
            ]
        }))
        .unwrap();

        assert_eq!(body.result.len(), 2);
        let paf = convert_address(
            body.result.into_iter().next().unwrap(),
            "ML30HS",
            "ML3 0HS",
            0,
        );
        assert_eq!(paf.line1, "3 Barrack Street");
        assert!(paf.line2.is_none());
        assert!(paf.county.is_none());
        assert!(paf.coordinates.is_none());
    }
}
