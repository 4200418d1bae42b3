//! Intermediate record shared by every PAF-family backend.

use ukaddr_core::{
    AddressSuggestion, BuildingType, Coordinates, PlaceIcon, ProviderTag, SearchType,
    StructuredAddress,
};

/// PAF results outrank every other provider.
const PAF_PRIORITY: u8 = 10;

/// Which PAF-compatible backend answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PafSource {
    Loqate,
    IdealPostcodes,
    RoyalMail,
}

impl PafSource {
    #[must_use]
    pub fn provider_tag(self) -> ProviderTag {
        match self {
            PafSource::Loqate => ProviderTag::Loqate,
            PafSource::IdealPostcodes => ProviderTag::IdealPostcodes,
            PafSource::RoyalMail => ProviderTag::RoyalMail,
        }
    }

    #[must_use]
    pub fn confidence(self) -> f64 {
        match self {
            PafSource::Loqate => 0.95,
            PafSource::IdealPostcodes => 0.9,
            PafSource::RoyalMail => 0.98,
        }
    }
}

/// A Postcode Address File record as returned by one of the PAF backends.
#[derive(Debug, Clone, PartialEq)]
pub struct PafAddress {
    pub id: String,
    pub line1: String,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub city: String,
    pub county: Option<String>,
    pub postcode: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub building_type: BuildingType,
    pub sub_building: Option<String>,
    pub confidence: f64,
    pub source: PafSource,
}

impl PafAddress {
    /// Comma-joined address lines, town and postcode.
    #[must_use]
    pub fn description(&self) -> String {
        let mut parts: Vec<&str> = vec![self.line1.as_str()];
        parts.extend(self.line2.as_deref());
        parts.extend(self.line3.as_deref());
        if !self.city.is_empty() {
            parts.push(&self.city);
        }
        parts.extend(self.postcode.as_deref());
        parts
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Converts the record into the unified suggestion shape.
    #[must_use]
    pub fn into_suggestion(self, search_type: SearchType) -> AddressSuggestion {
        let description = self.description();
        let center = self.coordinates.map(Coordinates::to_center);
        AddressSuggestion {
            id: self.id,
            text: self.line1.clone(),
            place_name: description.clone(),
            center,
            postcode: self.postcode.clone(),
            provider: self.source.provider_tag(),
            address: StructuredAddress {
                line1: self.line1,
                line2: self.line2,
                line3: self.line3,
                city: self.city,
                county: self.county,
                postcode: self.postcode.unwrap_or_default(),
                country: "GB".to_string(),
                full_address: description,
                building_type: Some(self.building_type),
                sub_building: self.sub_building,
            },
            coords: self.coordinates,
            priority: PAF_PRIORITY,
            has_complete_address: true,
            is_postcode_match: search_type == SearchType::Postcode,
            confidence: self.confidence,
            icon: PlaceIcon::for_building(self.building_type),
            kind: search_type,
        }
    }
}
