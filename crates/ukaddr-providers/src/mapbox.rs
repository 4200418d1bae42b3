//! Mapbox Geocoding v5 client and feature normalizer.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use serde::Deserialize;
use ukaddr_core::{
    canonical_postcode, AddressSuggestion, ClassifiedQuery, Coordinates, PlaceIcon, ProviderTag,
    SearchOptions, StructuredAddress,
};

use crate::error::ProviderError;
use crate::http::{
    join_path, non_blank, null_as_default, parse_base_url, send_json, string_or_number,
};

const PROVIDER: &str = "mapbox";
const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/";

/// `minLng,minLat,maxLng,maxLat` covering Great Britain and Northern Ireland.
const UK_BBOX: &str = "-8.2,49.9,1.8,60.9";

const COMPLETE_PRIORITY: u8 = 8;
const PARTIAL_PRIORITY: u8 = 5;
const COMPLETE_CONFIDENCE: f64 = 0.8;
const PARTIAL_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Default, Deserialize)]
pub struct MapboxResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<MapboxFeature>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MapboxFeature {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Street name for address features, otherwise the place's own name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub place_name: String,
    /// `[lng, lat]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub center: Vec<f64>,
    /// House number, present on address features only.
    #[serde(default, deserialize_with = "string_or_number")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: Vec<MapboxContext>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: MapboxProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct MapboxContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MapboxProperties {
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
}

/// Client for the Mapbox forward geocoding endpoint.
pub struct MapboxClient {
    client: Client,
    token: String,
    base_url: Url,
}

impl MapboxClient {
    /// Creates a client pointed at the production Mapbox API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingCredential`] when `token` is blank.
    pub fn new(client: Client, token: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(client, token, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingCredential`] when `token` is blank, or
    /// [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(client: Client, token: &str, base_url: &str) -> Result<Self, ProviderError> {
        let token = non_blank(token).ok_or(ProviderError::MissingCredential {
            provider: PROVIDER,
            credential: "MAPBOX_TOKEN",
        })?;
        Ok(Self {
            client,
            token,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Geocodes a classified query and normalizes every returned feature.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::InvalidToken`] when Mapbox answers 401.
    /// - [`ProviderError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ProviderError::Http`] on network failure.
    /// - [`ProviderError::Deserialize`] if the body is not a feature collection.
    pub async fn search(
        &self,
        query: &ClassifiedQuery,
        options: &SearchOptions,
    ) -> Result<Vec<AddressSuggestion>, ProviderError> {
        let url = self.build_url(query, options)?;
        tracing::debug!(
            provider = PROVIDER,
            query = %query.canonical,
            search_type = %query.search_type,
            "querying Mapbox geocoding"
        );

        let response: MapboxResponse =
            match send_json(PROVIDER, "mapbox.places", self.client.get(url)).await {
                Ok(body) => body,
                Err(ProviderError::UnexpectedStatus { status: 401, .. }) => {
                    return Err(ProviderError::InvalidToken {
                        provider: PROVIDER,
                        message: "Mapbox token is invalid or expired; check MAPBOX_TOKEN"
                            .to_string(),
                    });
                }
                Err(e) => return Err(e),
            };

        Ok(response
            .features
            .iter()
            .map(|feature| normalize_feature(feature, query))
            .collect())
    }

    fn build_url(
        &self,
        query: &ClassifiedQuery,
        options: &SearchOptions,
    ) -> Result<Url, ProviderError> {
        let encoded = utf8_percent_encode(&query.canonical, NON_ALPHANUMERIC);
        let mut url = join_path(
            &self.base_url,
            &format!("geocoding/v5/mapbox.places/{encoded}.json"),
        )?;

        let types = if query.is_postcode() {
            "postcode".to_string()
        } else {
            options
                .types
                .as_ref()
                .filter(|t| !t.is_empty())
                .map_or_else(|| "address,poi".to_string(), |t| t.join(","))
        };

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("access_token", &self.token);
            pairs.append_pair("country", "GB");
            pairs.append_pair("limit", &options.limit().to_string());
            pairs.append_pair("types", &types);
            if let Some(p) = options.proximity {
                pairs.append_pair("proximity", &format!("{},{}", p.lng, p.lat));
            }
            pairs.append_pair("bbox", UK_BBOX);
        }
        Ok(url)
    }
}

/// Converts one Mapbox feature into an [`AddressSuggestion`].
#[must_use]
pub fn normalize_feature(feature: &MapboxFeature, query: &ClassifiedQuery) -> AddressSuggestion {
    let context_text = |prefix: &str| -> Option<String> {
        feature
            .context
            .iter()
            .find(|c| c.id.starts_with(prefix))
            .and_then(|c| non_blank(&c.text))
    };

    let postcode = if query.is_postcode() {
        Some(query.canonical.clone())
    } else {
        feature
            .properties
            .postcode
            .as_deref()
            .and_then(non_blank)
            .or_else(|| context_text("postcode."))
            .and_then(|p| canonical_postcode(&p))
    };

    let city = context_text("place.")
        .or_else(|| context_text("locality."))
        .or_else(|| context_text("district."))
        .or_else(|| feature.properties.place.as_deref().and_then(non_blank))
        .unwrap_or_default();

    let number = feature.address.as_deref().and_then(non_blank);
    let street = non_blank(&feature.text);

    let line1 = match (&number, &street) {
        (Some(n), Some(s)) => format!("{n} {s}"),
        (None, Some(s)) => s.clone(),
        (_, None) => feature
            .place_name
            .split(',')
            .next()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
    };

    let has_complete_address = number.is_some() && street.is_some() && line1.len() > 5;

    let center = match feature.center.as_slice() {
        [lng, lat] if lng.is_finite() && lat.is_finite() => Some([*lng, *lat]),
        _ => None,
    };

    let icon = if has_complete_address {
        PlaceIcon::House
    } else if query.is_postcode() {
        PlaceIcon::Postcode
    } else {
        PlaceIcon::Pin
    };

    AddressSuggestion {
        id: feature.id.clone(),
        text: line1.clone(),
        place_name: feature.place_name.clone(),
        center,
        postcode: postcode.clone(),
        provider: ProviderTag::Mapbox,
        address: StructuredAddress {
            line1,
            line2: None,
            line3: None,
            city,
            county: None,
            postcode: postcode.unwrap_or_default(),
            country: "GB".to_string(),
            full_address: feature.place_name.clone(),
            building_type: None,
            sub_building: None,
        },
        coords: center.map(Coordinates::from_center),
        priority: if has_complete_address {
            COMPLETE_PRIORITY
        } else {
            PARTIAL_PRIORITY
        },
        has_complete_address,
        is_postcode_match: query.is_postcode(),
        confidence: if has_complete_address {
            COMPLETE_CONFIDENCE
        } else {
            PARTIAL_CONFIDENCE
        },
        icon,
        kind: query.search_type,
    }
}
