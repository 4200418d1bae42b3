//! Conversion of Google Places predictions into address suggestions.

use ukaddr_core::{
    canonical_postcode, AddressSuggestion, Coordinates, PlaceIcon, ProviderTag, SearchType,
    StructuredAddress,
};

use super::types::{GooglePlaceDetails, GooglePrediction, StructuredFormatting};

const COMPLETE_PRIORITY: u8 = 9;
const PARTIAL_PRIORITY: u8 = 6;
const COMPLETE_CONFIDENCE: f64 = 0.9;
const PARTIAL_CONFIDENCE: f64 = 0.7;

/// Picks a display icon from Google place type tags.
#[must_use]
pub fn icon_for_place_types(types: &[String]) -> PlaceIcon {
    let has = |tag: &str| types.iter().any(|t| t == tag);
    if has("premise") || has("street_address") {
        PlaceIcon::House
    } else if has("establishment") || has("point_of_interest") {
        PlaceIcon::Building
    } else if has("postal_code") {
        PlaceIcon::Postcode
    } else if has("locality") || has("administrative_area_level_1") {
        PlaceIcon::Locality
    } else {
        PlaceIcon::Pin
    }
}

/// Resolves the city from address components: `postal_town`, then
/// `locality`, then `administrative_area_level_2`.
#[must_use]
pub fn extract_city(details: &GooglePlaceDetails) -> String {
    details
        .component("postal_town")
        .or_else(|| details.component("locality"))
        .or_else(|| details.component("administrative_area_level_2"))
        .unwrap_or_default()
        .to_string()
}

/// Normalizes a prediction, optionally enriched with its details record.
///
/// `postcode_query` carries the canonical postcode when the search was a
/// postcode search; it overrides whatever the prediction implies.
#[must_use]
pub fn normalize_prediction(
    prediction: &GooglePrediction,
    details: Option<&GooglePlaceDetails>,
    search_type: SearchType,
    postcode_query: Option<&str>,
) -> AddressSuggestion {
    let main_text = prediction.structured_formatting.main_text.trim();
    let mut line1 = if main_text.is_empty() {
        prediction
            .description
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    } else {
        main_text.to_string()
    };
    let mut line2 = None;

    let has_complete_address = if let Some(d) = details {
        let number = d.component("street_number");
        let route = d.component("route");
        match (number, route) {
            (Some(n), Some(r)) => {
                line1 = format!("{n} {r}");
                line2 = d
                    .component("subpremise")
                    .map(|s| format!("Flat {s}"))
                    .or_else(|| d.component("premise").map(str::to_string));
            }
            (None, Some(r)) => line1 = r.to_string(),
            _ => {}
        }
        number.is_some() && route.is_some()
    } else {
        // Without details, a prediction whose main text opens with a house
        // number ("221B Baker Street") is the best signal available.
        line1.starts_with(|c: char| c.is_ascii_digit()) && line1.contains(' ') && line1.len() > 5
    };

    let postcode = postcode_query.map(str::to_string).or_else(|| {
        details
            .and_then(|d| d.component_short("postal_code"))
            .and_then(canonical_postcode)
    });

    let location = details.and_then(GooglePlaceDetails::location);
    let coords = location.map(|l| Coordinates {
        lat: l.lat,
        lng: l.lng,
    });

    let full_address = details
        .map(|d| d.formatted_address.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(prediction.description.as_str())
        .to_string();

    let icon = if has_complete_address {
        PlaceIcon::House
    } else if search_type == SearchType::Postcode {
        PlaceIcon::Postcode
    } else {
        icon_for_place_types(&prediction.types)
    };

    AddressSuggestion {
        id: prediction.place_id.clone(),
        text: line1.clone(),
        place_name: prediction.description.clone(),
        center: coords.map(Coordinates::to_center),
        postcode: postcode.clone(),
        provider: ProviderTag::Google,
        address: StructuredAddress {
            line1,
            line2,
            line3: None,
            city: details.map(extract_city).unwrap_or_default(),
            county: details
                .and_then(|d| d.component("administrative_area_level_2"))
                .map(str::to_string),
            postcode: postcode.unwrap_or_default(),
            country: "GB".to_string(),
            full_address,
            building_type: None,
            sub_building: details
                .and_then(|d| d.component("subpremise"))
                .map(|s| format!("Flat {s}")),
        },
        coords,
        priority: if has_complete_address {
            COMPLETE_PRIORITY
        } else {
            PARTIAL_PRIORITY
        },
        has_complete_address,
        is_postcode_match: search_type == SearchType::Postcode,
        confidence: if has_complete_address {
            COMPLETE_CONFIDENCE
        } else {
            PARTIAL_CONFIDENCE
        },
        icon,
        kind: search_type,
    }
}

/// Normalizes a details record looked up by place id on its own.
#[must_use]
pub fn normalize_details(details: &GooglePlaceDetails) -> AddressSuggestion {
    let prediction = GooglePrediction {
        description: details.formatted_address.clone(),
        place_id: details.place_id.clone(),
        structured_formatting: StructuredFormatting {
            main_text: details
                .formatted_address
                .split(',')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
            secondary_text: String::new(),
        },
        types: details.types.clone(),
    };
    normalize_prediction(&prediction, Some(details), SearchType::Address, None)
}
