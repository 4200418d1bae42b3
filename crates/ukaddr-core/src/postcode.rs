//! UK postcode recognition and query classification.
//!
//! Decides whether user input is a postcode or a free-text address and
//! produces the canonical query string each provider receives.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Queries shorter than this never reach the cache or any provider.
pub const MIN_QUERY_LEN: usize = 3;

/// Royal Mail grammar: the inward code's final pair never uses C, I, K, M, O or V.
/// Letter classes are ASCII-only; no Unicode case folding.
static UK_POSTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{1,2}[0-9Rr][0-9A-Za-z]?\s*[0-9][ABD-HJLNP-UW-Zabd-hjlnp-uw-z]{2}$")
        .expect("valid regex")
});

static EMBEDDED_POSTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z]{1,2}[0-9][A-Za-z0-9]?\s*[0-9][ABD-HJLNP-UW-Zabd-hjlnp-uw-z]{2}\b")
        .expect("valid regex")
});

const UK_ADDRESS_KEYWORDS: &[&str] = &[
    "street",
    "road",
    "avenue",
    "lane",
    "close",
    "drive",
    "way",
    "place",
    "glasgow",
    "london",
    "manchester",
    "birmingham",
    "edinburgh",
    "liverpool",
    "bristol",
    "leeds",
    "sheffield",
    "bradford",
    "newcastle",
    "nottingham",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Postcode,
    Address,
}

impl SearchType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchType::Postcode => "postcode",
            SearchType::Address => "address",
        }
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of classifying raw user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedQuery {
    pub search_type: SearchType,
    /// Canonical postcode (`SW1A 1AA`) or the trimmed address text.
    pub canonical: String,
}

impl ClassifiedQuery {
    #[must_use]
    pub fn is_postcode(&self) -> bool {
        self.search_type == SearchType::Postcode
    }
}

/// Returns `true` when the trimmed input is a complete UK postcode.
///
/// The space between outward and inward code is optional, so `sw1a1aa`
/// and `SW1A 1AA` are both accepted.
#[must_use]
pub fn is_valid_uk_postcode(input: &str) -> bool {
    UK_POSTCODE_RE.is_match(input.trim())
}

/// Canonicalises postcode text: trimmed, upper-cased, with exactly one
/// space before the three-character inward code.
///
/// Input that is not a recognisable postcode is upper-cased with its
/// whitespace collapsed, without inserting a separator.
#[must_use]
pub fn format_uk_postcode(input: &str) -> String {
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if is_valid_uk_postcode(&compact) {
        // Validated against an ASCII-only grammar, so byte slicing is safe.
        let split = compact.len() - 3;
        return format!("{} {}", &compact[..split], &compact[split..]);
    }

    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// Normalises a postcode supplied by a provider response.
///
/// Returns `None` for blank values so callers never surface an empty
/// postcode string.
#[must_use]
pub fn canonical_postcode(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(format_uk_postcode(trimmed))
}

/// Finds the first postcode embedded in a longer address string.
#[must_use]
pub fn extract_postcode(text: &str) -> Option<String> {
    EMBEDDED_POSTCODE_RE
        .find(text)
        .map(|m| format_uk_postcode(m.as_str()))
}

/// Heuristic used to decide whether a free-text query is worth sending to
/// the PAF-family providers: it mentions a street-type word or a major UK
/// city.
#[must_use]
pub fn is_uk_address_query(query: &str) -> bool {
    let lowered = query.to_lowercase();
    UK_ADDRESS_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Classifies raw input as a postcode or address search.
#[must_use]
pub fn classify(query: &str) -> ClassifiedQuery {
    let trimmed = query.trim();
    if is_valid_uk_postcode(trimmed) {
        ClassifiedQuery {
            search_type: SearchType::Postcode,
            canonical: format_uk_postcode(trimmed),
        }
    } else {
        ClassifiedQuery {
            search_type: SearchType::Address,
            canonical: trimmed.to_string(),
        }
    }
}
