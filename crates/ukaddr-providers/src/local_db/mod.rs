//! Offline fallback: a small static table of known UK addresses.
//!
//! The table is the last step of the lookup chain and needs no credentials,
//! so a search always has somewhere to land even with every key unset.

mod records;

use ukaddr_core::{
    format_uk_postcode, AddressSuggestion, ClassifiedQuery, Coordinates, PlaceIcon, ProviderTag,
    SearchType, StructuredAddress,
};

pub use records::{UkAddressRecord, RECORDS};

const LOCAL_PRIORITY: u8 = 7;

/// Records whose postcode equals `postcode` after canonicalisation.
#[must_use]
pub fn search_by_postcode(postcode: &str) -> Vec<&'static UkAddressRecord> {
    let wanted = format_uk_postcode(postcode);
    RECORDS.iter().filter(|r| r.postcode == wanted).collect()
}

/// Records sharing the outward code (the part before the space).
#[must_use]
pub fn search_by_partial_postcode(postcode: &str) -> Vec<&'static UkAddressRecord> {
    let wanted = format_uk_postcode(postcode);
    let Some(outward) = wanted.split_whitespace().next() else {
        return vec![];
    };
    RECORDS
        .iter()
        .filter(|r| r.postcode.split_whitespace().next() == Some(outward))
        .collect()
}

/// Records whose first or second line contains `street`, ignoring case.
#[must_use]
pub fn search_by_street(street: &str) -> Vec<&'static UkAddressRecord> {
    let needle = street.trim().to_lowercase();
    if needle.is_empty() {
        return vec![];
    }
    RECORDS
        .iter()
        .filter(|r| {
            r.line1.to_lowercase().contains(&needle)
                || r.line2.is_some_and(|l| l.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Records whose city contains the query or is contained in it.
#[must_use]
pub fn search_by_city(city: &str) -> Vec<&'static UkAddressRecord> {
    let needle = city.trim().to_lowercase();
    if needle.is_empty() {
        return vec![];
    }
    RECORDS
        .iter()
        .filter(|r| {
            let c = r.city.to_lowercase();
            c.contains(&needle) || needle.contains(&c)
        })
        .collect()
}

/// Searches the table the way the query was classified: postcodes by exact
/// then outward-code match, free text by street then city.
#[must_use]
pub fn search(query: &ClassifiedQuery, limit: u32) -> Vec<AddressSuggestion> {
    let hits = if query.is_postcode() {
        let exact = search_by_postcode(&query.canonical);
        if exact.is_empty() {
            search_by_partial_postcode(&query.canonical)
        } else {
            exact
        }
    } else {
        let by_street = search_by_street(&query.canonical);
        if by_street.is_empty() {
            search_by_city(&query.canonical)
        } else {
            by_street
        }
    };

    tracing::debug!(query = %query.canonical, count = hits.len(), "local database search");
    hits.into_iter()
        .take(limit as usize)
        .map(|r| to_suggestion(r, query.search_type))
        .collect()
}

/// Copies a record into the suggestion shape.
#[must_use]
pub fn to_suggestion(record: &UkAddressRecord, search_type: SearchType) -> AddressSuggestion {
    let full_address = [Some(record.line1), record.line2, Some(record.city), Some(record.postcode)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    let coords = Coordinates {
        lat: record.lat,
        lng: record.lng,
    };

    AddressSuggestion {
        id: record.id.to_string(),
        text: record.line1.to_string(),
        place_name: full_address.clone(),
        center: Some(coords.to_center()),
        postcode: Some(record.postcode.to_string()),
        provider: ProviderTag::UkDatabase,
        address: StructuredAddress {
            line1: record.line1.to_string(),
            line2: record.line2.map(str::to_string),
            line3: None,
            city: record.city.to_string(),
            county: Some(record.county.to_string()),
            postcode: record.postcode.to_string(),
            country: "GB".to_string(),
            full_address,
            building_type: Some(record.building_type),
            sub_building: None,
        },
        coords: Some(coords),
        priority: LOCAL_PRIORITY,
        has_complete_address: true,
        is_postcode_match: search_type == SearchType::Postcode,
        confidence: record.confidence,
        icon: PlaceIcon::for_building(record.building_type),
        kind: search_type,
    }
}
