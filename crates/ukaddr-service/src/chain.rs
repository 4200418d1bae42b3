//! The fixed-order provider fallback chain.

use std::time::Instant;

use ukaddr_core::{
    is_uk_address_query, AddressSuggestion, ClassifiedQuery, ProviderFamily, SearchOptions,
};
use ukaddr_providers::{local_db, GooglePlacesClient, MapboxClient, PafClient, ProviderError};

use crate::health::ChainHealth;

/// Providers tried in priority order: PAF, Mapbox, Google Places, then the
/// local database. The first step to produce suggestions wins.
#[derive(Default)]
pub struct ProviderChain {
    pub(crate) paf: PafClient,
    pub(crate) mapbox: Option<MapboxClient>,
    pub(crate) google: Option<GooglePlacesClient>,
}

/// Tracks one run through the chain so outcomes land in [`ChainHealth`].
struct Run<'a> {
    health: &'a ChainHealth,
    query: &'a str,
    fell_through: bool,
}

impl Run<'_> {
    fn settle(
        &mut self,
        family: ProviderFamily,
        started: Instant,
        outcome: Result<Vec<AddressSuggestion>, ProviderError>,
    ) -> Option<Vec<AddressSuggestion>> {
        let elapsed = started.elapsed();
        match outcome {
            Ok(found) if !found.is_empty() => {
                self.health
                    .record_success(family, elapsed, self.fell_through);
                Some(answered(found))
            }
            Ok(_) => {
                tracing::debug!(provider = %family, "no results");
                self.health.record_empty(family, elapsed);
                self.fell_through = true;
                None
            }
            Err(e) => {
                tracing::warn!(
                    provider = %family,
                    query = self.query,
                    error = %e,
                    "provider search failed"
                );
                self.health.record_failure(family, elapsed);
                self.fell_through = true;
                None
            }
        }
    }
}

impl ProviderChain {
    /// Runs the chain. Provider failures are logged and treated as empty
    /// results, so the worst case is an empty list.
    pub async fn resolve(
        &self,
        query: &ClassifiedQuery,
        options: &SearchOptions,
        health: &ChainHealth,
    ) -> Vec<AddressSuggestion> {
        let limit = options.limit();
        let mut run = Run {
            health,
            query: &query.canonical,
            fell_through: false,
        };

        // PAF
        if query.is_postcode() || is_uk_address_query(&query.canonical) {
            if self.paf.is_configured() {
                let started = Instant::now();
                let outcome = self.paf.search_suggestions(query, limit).await;
                if let Some(found) = run.settle(ProviderFamily::Paf, started, outcome) {
                    return found;
                }
            } else {
                tracing::debug!(provider = "paf", "skipped: no PAF credentials");
            }
        }

        // Mapbox
        if let Some(mapbox) = &self.mapbox {
            let started = Instant::now();
            let outcome = mapbox.search(query, options).await;
            if let Some(found) = run.settle(ProviderFamily::Mapbox, started, outcome) {
                return found;
            }
        }

        // Google Places only stands in for Mapbox when asked to, or when
        // there is no Mapbox token at all.
        if let Some(google) = &self.google {
            if options.use_google_places || self.mapbox.is_none() {
                let started = Instant::now();
                let outcome = google.search(query, options).await;
                if let Some(found) = run.settle(ProviderFamily::Google, started, outcome) {
                    return found;
                }
            }
        }

        let started = Instant::now();
        let outcome = Ok(local_db::search(query, limit));
        if let Some(found) = run.settle(ProviderFamily::UkDatabase, started, outcome) {
            return found;
        }
        tracing::debug!(query = %query.canonical, "no provider returned results");
        health.record_unanswered();
        vec![]
    }
}

fn answered(found: Vec<AddressSuggestion>) -> Vec<AddressSuggestion> {
    if let Some(first) = found.first() {
        tracing::debug!(
            provider = %first.provider,
            family = %first.provider.family(),
            count = found.len(),
            "provider answered"
        );
    }
    found
}
