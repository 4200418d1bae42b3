//! Building-type and sub-building inference from PAF address lines.

use std::sync::LazyLock;

use regex::Regex;
use ukaddr_core::BuildingType;

static FLAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:flat|apartment|apt)\.?\s*(\d+[a-z]?)\b").expect("valid regex")
});
static UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bunit\s*(\d+[a-z]?)\b").expect("valid regex"));

/// Guesses what kind of building an address refers to.
#[must_use]
pub fn determine_building_type(line1: &str, line2: &str) -> BuildingType {
    let text = format!("{line1} {line2}").to_lowercase();

    if text.contains("flat") {
        BuildingType::Flat
    } else if text.contains("apartment") || text.contains("apt ") {
        BuildingType::Apartment
    } else if text.contains("house") || line1.trim_start().starts_with(|c: char| c.is_ascii_digit())
    {
        BuildingType::House
    } else if text.contains("office") || text.contains("building") || text.contains("centre") {
        BuildingType::Commercial
    } else {
        BuildingType::Other
    }
}

/// Extracts a unit label such as `Flat 4` or `Unit 12B`.
#[must_use]
pub fn extract_sub_building(line1: &str, line2: &str) -> Option<String> {
    let text = format!("{line1} {line2}");

    if let Some(cap) = FLAT_RE.captures(&text) {
        return Some(format!("Flat {}", cap[1].to_uppercase()));
    }
    UNIT_RE
        .captures(&text)
        .map(|cap| format!("Unit {}", cap[1].to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_keyword_wins() {
        assert_eq!(
            determine_building_type("Flat 4", "12 High Street"),
            BuildingType::Flat
        );
    }

    #[test]
    fn apartment_keyword() {
        assert_eq!(
            determine_building_type("Apartment 7, Riverside", ""),
            BuildingType::Apartment
        );
    }

    #[test]
    fn digit_leading_line_is_house() {
        assert_eq!(
            determine_building_type("27 Barrack Street", ""),
            BuildingType::House
        );
    }

    #[test]
    fn office_words_are_commercial() {
        assert_eq!(
            determine_building_type("Regus Business Centre", "Barrack Street"),
            BuildingType::Commercial
        );
    }

    #[test]
    fn fallback_is_other() {
        assert_eq!(determine_building_type("The Old Mill", ""), BuildingType::Other);
    }

    #[test]
    fn sub_building_labels() {
        assert_eq!(extract_sub_building("Flat 4a", ""), Some("Flat 4A".to_string()));
        assert_eq!(
            extract_sub_building("Apartment 12", "Quay"),
            Some("Flat 12".to_string())
        );
        assert_eq!(
            extract_sub_building("Unit 3", "Trade Park"),
            Some("Unit 3".to_string())
        );
        assert_eq!(extract_sub_building("10 Downing Street", ""), None);
    }
}
