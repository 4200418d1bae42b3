//! The unified address suggestion record every provider normalizes into.

use serde::{Deserialize, Serialize};

use crate::postcode::SearchType;

/// Result count used when the caller does not supply a limit.
pub const DEFAULT_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// `[lng, lat]`, the order geocoders use for a feature center.
    #[must_use]
    pub fn to_center(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    #[must_use]
    pub fn from_center(center: [f64; 2]) -> Self {
        Self {
            lng: center[0],
            lat: center[1],
        }
    }
}

/// Which backend produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderTag {
    Loqate,
    IdealPostcodes,
    RoyalMail,
    Mapbox,
    Google,
    UkDatabase,
}

/// Coarse grouping of [`ProviderTag`]s by lookup chain step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderFamily {
    Paf,
    Mapbox,
    Google,
    UkDatabase,
}

impl ProviderTag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderTag::Loqate => "loqate",
            ProviderTag::IdealPostcodes => "ideal-postcodes",
            ProviderTag::RoyalMail => "royal-mail",
            ProviderTag::Mapbox => "mapbox",
            ProviderTag::Google => "google",
            ProviderTag::UkDatabase => "uk-database",
        }
    }

    #[must_use]
    pub fn family(self) -> ProviderFamily {
        match self {
            ProviderTag::Loqate | ProviderTag::IdealPostcodes | ProviderTag::RoyalMail => {
                ProviderFamily::Paf
            }
            ProviderTag::Mapbox => ProviderFamily::Mapbox,
            ProviderTag::Google => ProviderFamily::Google,
            ProviderTag::UkDatabase => ProviderFamily::UkDatabase,
        }
    }
}

impl std::fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProviderFamily {
    /// Every family, in chain order.
    pub const ALL: [ProviderFamily; 4] = [
        ProviderFamily::Paf,
        ProviderFamily::Mapbox,
        ProviderFamily::Google,
        ProviderFamily::UkDatabase,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderFamily::Paf => "paf",
            ProviderFamily::Mapbox => "mapbox",
            ProviderFamily::Google => "google",
            ProviderFamily::UkDatabase => "uk-database",
        }
    }
}

impl std::fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of the subject of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingType {
    House,
    Flat,
    Apartment,
    Commercial,
    Other,
}

/// Display hint rendered next to a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceIcon {
    House,
    Building,
    Store,
    Postcode,
    Locality,
    Pin,
}

impl PlaceIcon {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            PlaceIcon::House => "\u{1f3e0}",
            PlaceIcon::Building => "\u{1f3e2}",
            PlaceIcon::Store => "\u{1f3ec}",
            PlaceIcon::Postcode => "\u{1f4ee}",
            PlaceIcon::Locality => "\u{1f3d8}\u{fe0f}",
            PlaceIcon::Pin => "\u{1f4cd}",
        }
    }

    /// Icon for a building type reported by a PAF backend.
    #[must_use]
    pub fn for_building(building_type: BuildingType) -> Self {
        match building_type {
            BuildingType::House => PlaceIcon::House,
            BuildingType::Flat | BuildingType::Apartment => PlaceIcon::Building,
            BuildingType::Commercial | BuildingType::Other => PlaceIcon::Store,
        }
    }
}

/// Postal address split into the lines a booking form needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredAddress {
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line3: Option<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    /// Canonical postcode, or empty when the provider did not resolve one.
    pub postcode: String,
    pub country: String,
    pub full_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_type: Option<BuildingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_building: Option<String>,
}

/// A single normalized suggestion, whatever provider produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressSuggestion {
    /// Provider-scoped identifier.
    pub id: String,
    /// Single-line display text.
    pub text: String,
    pub place_name: String,
    /// `[lng, lat]`; `None` when the provider returned no geometry.
    pub center: Option<[f64; 2]>,
    pub postcode: Option<String>,
    pub provider: ProviderTag,
    pub address: StructuredAddress,
    pub coords: Option<Coordinates>,
    pub priority: u8,
    pub has_complete_address: bool,
    pub is_postcode_match: bool,
    pub confidence: f64,
    pub icon: PlaceIcon,
    pub kind: SearchType,
}

/// Caller-supplied tuning for a search. Serialized into the cache key, so
/// two searches only share a cache entry when their options are identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proximity: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Ask for Google Places even when Mapbox is configured.
    #[serde(default)]
    pub use_google_places: bool,
}

impl SearchOptions {
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT)
    }

    #[must_use]
    pub fn with_google_places(mut self, use_google_places: bool) -> Self {
        self.use_google_places = use_google_places;
        self
    }
}
