//! Google Places Autocomplete and Details response types.

use serde::Deserialize;

use crate::http::null_as_default;

#[derive(Debug, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub predictions: Vec<GooglePrediction>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GooglePrediction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub place_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub structured_formatting: StructuredFormatting,
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuredFormatting {
    #[serde(default, deserialize_with = "null_as_default")]
    pub main_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub secondary_text: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub result: Option<GooglePlaceDetails>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GooglePlaceDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub place_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub formatted_address: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address_components: Vec<AddressComponent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressComponent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub long_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,
}

impl GooglePlaceDetails {
    /// Long name of the first component tagged with `kind`.
    #[must_use]
    pub fn component(&self, kind: &str) -> Option<&str> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
            .map(|c| c.long_name.trim())
            .filter(|s| !s.is_empty())
    }

    /// Short name of the first component tagged with `kind`.
    #[must_use]
    pub fn component_short(&self, kind: &str) -> Option<&str> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
            .map(|c| c.short_name.trim())
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn location(&self) -> Option<LatLng> {
        self.geometry.as_ref().and_then(|g| g.location)
    }
}
