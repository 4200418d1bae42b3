//! Google Places Autocomplete / Details client.

mod normalize;
pub mod types;

use reqwest::{Client, Url};
use ukaddr_core::{AddressSuggestion, ClassifiedQuery, SearchOptions};

pub use normalize::{extract_city, icon_for_place_types, normalize_details, normalize_prediction};
pub use types::{GooglePlaceDetails, GooglePrediction};

use crate::error::ProviderError;
use crate::http::{join_path, non_blank, parse_base_url, send_json};
use types::{AutocompleteResponse, DetailsResponse};

const PROVIDER: &str = "google";
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const DETAILS_FIELDS: &str = "place_id,formatted_address,geometry,address_components,types";
/// Location-bias radius in metres applied when the caller supplies a proximity.
const PROXIMITY_RADIUS_M: u32 = 50_000;

/// Client for Google Places Autocomplete and Place Details.
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl GooglePlacesClient {
    /// Creates a client pointed at the production Google Maps API.
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
            credential: "GOOGLE_MAPS_API_KEY",
        })?;
        Ok(Self {
            client,
            api_key,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Fetches autocomplete predictions for a classified query.
    ///
    /// `OK` and `ZERO_RESULTS` are success; any other status is an error.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::ApiStatus`] for statuses such as `REQUEST_DENIED`.
    /// - [`ProviderError::UnexpectedStatus`] / [`ProviderError::Http`] on
    ///   transport failure.
    /// - [`ProviderError::Deserialize`] if the body is malformed.
    pub async fn autocomplete(
        &self,
        query: &ClassifiedQuery,
        options: &SearchOptions,
    ) -> Result<Vec<GooglePrediction>, ProviderError> {
        let mut url = join_path(&self.base_url, "maps/api/place/autocomplete/json")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("input", &query.canonical);
            pairs.append_pair("key", &self.api_key);
            pairs.append_pair("components", "country:gb");
            pairs.append_pair(
                "types",
                if query.is_postcode() {
                    "postal_code"
                } else {
                    "address|establishment"
                },
            );
            pairs.append_pair("language", "en-GB");
            if let Some(p) = options.proximity {
                pairs.append_pair("location", &format!("{},{}", p.lat, p.lng));
                pairs.append_pair("radius", &PROXIMITY_RADIUS_M.to_string());
            }
        }

        let body: AutocompleteResponse =
            send_json(PROVIDER, "place/autocomplete", self.client.get(url)).await?;
        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body.predictions),
            other => Err(ProviderError::ApiStatus {
                provider: PROVIDER,
                status: body
                    .error_message
                    .map_or_else(|| other.to_string(), |m| format!("{other}: {m}")),
            }),
        }
    }

    /// Looks up full details for a place id.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::ApiStatus`] unless the status is `OK` with a result.
    /// - [`ProviderError::UnexpectedStatus`] / [`ProviderError::Http`] on
    ///   transport failure.
    /// - [`ProviderError::Deserialize`] if the body is malformed.
    pub async fn details(&self, place_id: &str) -> Result<GooglePlaceDetails, ProviderError> {
        let mut url = join_path(&self.base_url, "maps/api/place/details/json")?;
        url.query_pairs_mut()
            .append_pair("place_id", place_id)
            .append_pair("key", &self.api_key)
            .append_pair("fields", DETAILS_FIELDS)
            .append_pair("language", "en-GB");

        let body: DetailsResponse =
            send_json(PROVIDER, "place/details", self.client.get(url)).await?;
        match (body.status.as_str(), body.result) {
            ("OK", Some(result)) => Ok(result),
            (status, _) => Err(ProviderError::ApiStatus {
                provider: PROVIDER,
                status: body
                    .error_message
                    .map_or_else(|| status.to_string(), |m| format!("{status}: {m}")),
            }),
        }
    }

    /// Autocompletes a query and normalizes up to `options.limit()`
    /// predictions. Predictions are not enriched with details here, so each
    /// search costs a single request.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`GooglePlacesClient::autocomplete`].
    pub async fn search(
        &self,
        query: &ClassifiedQuery,
        options: &SearchOptions,
    ) -> Result<Vec<AddressSuggestion>, ProviderError> {
        tracing::debug!(
            provider = PROVIDER,
            query = %query.canonical,
            search_type = %query.search_type,
            "querying Google Places autocomplete"
        );
        let predictions = self.autocomplete(query, options).await?;
        let postcode_query = query.is_postcode().then_some(query.canonical.as_str());

        Ok(predictions
            .iter()
            .take(options.limit() as usize)
            .map(|p| normalize_prediction(p, None, query.search_type, postcode_query))
            .collect())
    }

    /// Looks up a place id and normalizes it into an enriched suggestion.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`GooglePlacesClient::details`].
    pub async fn place_suggestion(
        &self,
        place_id: &str,
    ) -> Result<AddressSuggestion, ProviderError> {
        let details = self.details(place_id).await?;
        Ok(normalize_details(&details))
    }
}
