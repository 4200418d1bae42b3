//! Subcommand handlers. Each prints pretty JSON to stdout; logs go to stderr.

use anyhow::Context;
use serde::Serialize;
use ukaddr_core::{
    classify, is_uk_address_query, AddressSuggestion, AppConfig, Coordinates, SearchOptions,
};
use ukaddr_providers::{build_client, PostcodesIoClient};
use ukaddr_service::AddressService;

#[derive(Debug, Serialize)]
struct Classification<'a> {
    input: &'a str,
    search_type: &'static str,
    canonical: String,
    uk_address_keywords: bool,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}

pub(crate) fn search_options(limit: Option<u32>, proximity: Option<(f64, f64)>) -> SearchOptions {
    SearchOptions {
        proximity: proximity.map(|(lat, lng)| Coordinates { lat, lng }),
        limit,
        ..SearchOptions::default()
    }
}

pub(crate) async fn run_search(
    config: &AppConfig,
    query: &str,
    options: SearchOptions,
    google: bool,
    plain: bool,
) -> anyhow::Result<()> {
    let service = AddressService::from_config(config).context("failed to build address service")?;

    let suggestions = if google {
        service.search_luxury(query, options).await
    } else {
        service.search_standard(query, options).await
    };
    let health = service.health();
    tracing::info!(
        query,
        count = suggestions.len(),
        fallback_answers = health.fallback_answers,
        "search complete"
    );
    if let Ok(report) = serde_json::to_string(&health) {
        tracing::debug!(%report, "provider health");
    }

    if plain {
        for s in &suggestions {
            println!("{}", plain_line(s));
        }
        return Ok(());
    }
    print_json(&suggestions)
}

pub(crate) fn plain_line(suggestion: &AddressSuggestion) -> String {
    format!(
        "{} {} [{}]",
        suggestion.icon.glyph(),
        suggestion.place_name,
        suggestion.provider
    )
}

pub(crate) fn run_classify(query: &str) -> anyhow::Result<()> {
    let classified = classify(query);
    print_json(&Classification {
        input: query,
        search_type: classified.search_type.as_str(),
        canonical: classified.canonical,
        uk_address_keywords: is_uk_address_query(query),
    })
}

pub(crate) async fn run_postcode(
    config: &AppConfig,
    postcode: &str,
    lookup: bool,
) -> anyhow::Result<()> {
    let http = build_client(config.request_timeout_secs, &config.user_agent)?;
    let client = PostcodesIoClient::new(http)?;

    if lookup {
        let found = client
            .lookup(postcode)
            .await
            .with_context(|| format!("postcode lookup failed for {postcode}"))?;
        if found.is_none() {
            tracing::warn!(postcode, "postcode not found");
        }
        print_json(&found)
    } else {
        let completions = client
            .autocomplete(postcode)
            .await
            .with_context(|| format!("postcode autocomplete failed for {postcode}"))?;
        print_json(&completions)
    }
}

pub(crate) async fn run_place(config: &AppConfig, place_id: &str) -> anyhow::Result<()> {
    if config.google_maps_api_key.is_none() {
        anyhow::bail!("GOOGLE_MAPS_API_KEY must be set to resolve place ids");
    }
    let service = AddressService::from_config(config).context("failed to build address service")?;
    let suggestion = service
        .place_details(place_id)
        .await
        .with_context(|| format!("no place details for {place_id}"))?;
    print_json(&suggestion)
}
