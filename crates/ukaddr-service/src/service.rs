use std::sync::Arc;
use std::time::Duration;

use ukaddr_core::{classify, AddressSuggestion, AppConfig, SearchOptions, MIN_QUERY_LEN};
use ukaddr_providers::{build_client, GooglePlacesClient, MapboxClient, PafClient};

use crate::cache::{cache_key, CacheStats, SuggestionCache};
use crate::chain::ProviderChain;
use crate::debounce::Debouncer;
use crate::error::ServiceError;
use crate::health::{ChainHealth, HealthReport};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
const DEFAULT_CACHE_MAX_ENTRIES: usize = 512;

struct Inner {
    chain: ProviderChain,
    cache: SuggestionCache,
    debouncer: Debouncer<Vec<AddressSuggestion>>,
    health: ChainHealth,
}

/// Address autocomplete entry point.
///
/// Cheap to clone; clones share the cache and the debounce timer.
#[derive(Clone)]
pub struct AddressService {
    inner: Arc<Inner>,
}

impl AddressService {
    /// Wires every provider whose credentials are present in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Provider`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let http = build_client(config.request_timeout_secs, &config.user_agent)?;

        let mut builder = Self::builder()
            .paf(PafClient::from_config(&http, config)?)
            .debounce(Duration::from_millis(config.debounce_ms))
            .cache_ttl(Duration::from_secs(config.cache_ttl_secs))
            .cache_max_entries(config.cache_max_entries);
        if let Some(token) = config.mapbox_token.as_deref() {
            builder = builder.mapbox(MapboxClient::new(http.clone(), token)?);
        }
        if let Some(key) = config.google_maps_api_key.as_deref() {
            builder = builder.google(GooglePlacesClient::new(http.clone(), key)?);
        }

        tracing::info!(
            env = %config.env,
            paf = config.has_paf_credentials(),
            mapbox = config.mapbox_token.is_some(),
            google = config.google_maps_api_key.is_some(),
            "address service configured"
        );
        Ok(builder.build())
    }

    #[must_use]
    pub fn builder() -> AddressServiceBuilder {
        AddressServiceBuilder::default()
    }

    /// Debounced search. Calls arriving within the debounce window share the
    /// result of the last one.
    pub async fn search(&self, query: &str, options: SearchOptions) -> Vec<AddressSuggestion> {
        if below_min_len(query) {
            return vec![];
        }
        let this = self.clone();
        let query = query.to_string();
        self.inner
            .debouncer
            .call(async move { this.search_now(&query, &options).await })
            .await
            .unwrap_or_default()
    }

    /// Searches immediately, bypassing the debouncer.
    pub async fn search_now(&self, query: &str, options: &SearchOptions) -> Vec<AddressSuggestion> {
        if below_min_len(query) {
            return vec![];
        }

        let key = cache_key(query, options);
        if let Some(hit) = self.inner.cache.get(&key) {
            tracing::debug!(query, count = hit.len(), "cache hit");
            self.inner.health.record_cache(true);
            return hit;
        }
        self.inner.health.record_cache(false);

        let classified = classify(query);
        tracing::debug!(
            query = %classified.canonical,
            search_type = %classified.search_type,
            "resolving address query"
        );
        let found = self
            .inner
            .chain
            .resolve(&classified, options, &self.inner.health)
            .await;
        if !found.is_empty() {
            self.inner.cache.insert(key, found.clone());
        }
        found
    }

    /// Debounced search with Google Places enabled, as used by the luxury
    /// booking flow.
    pub async fn search_luxury(&self, query: &str, options: SearchOptions) -> Vec<AddressSuggestion> {
        self.search(query, options.with_google_places(true)).await
    }

    /// Debounced search with Google Places only as a no-Mapbox fallback.
    pub async fn search_standard(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Vec<AddressSuggestion> {
        self.search(query, options.with_google_places(false)).await
    }

    /// Resolves a Google place id into an enriched suggestion. `None` when
    /// Google Places is not configured or the lookup fails.
    pub async fn place_details(&self, place_id: &str) -> Option<AddressSuggestion> {
        let Some(google) = &self.inner.chain.google else {
            tracing::debug!("place details requested without a Google key");
            return None;
        };
        match google.place_suggestion(place_id).await {
            Ok(suggestion) => Some(suggestion),
            Err(e) => {
                tracing::warn!(place_id, error = %e, "place details lookup failed");
                None
            }
        }
    }

    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Provider outcome and cache counters since the service was built.
    #[must_use]
    pub fn health(&self) -> HealthReport {
        self.inner.health.report()
    }
}

fn below_min_len(query: &str) -> bool {
    query.trim().chars().count() < MIN_QUERY_LEN
}

/// Assembles an [`AddressService`] from explicit provider clients.
pub struct AddressServiceBuilder {
    chain: ProviderChain,
    debounce: Duration,
    cache_ttl: Duration,
    cache_max_entries: usize,
}

impl Default for AddressServiceBuilder {
    fn default() -> Self {
        Self {
            chain: ProviderChain::default(),
            debounce: DEFAULT_DEBOUNCE,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl AddressServiceBuilder {
    #[must_use]
    pub fn paf(mut self, paf: PafClient) -> Self {
        self.chain.paf = paf;
        self
    }

    #[must_use]
    pub fn mapbox(mut self, mapbox: MapboxClient) -> Self {
        self.chain.mapbox = Some(mapbox);
        self
    }

    #[must_use]
    pub fn google(mut self, google: GooglePlacesClient) -> Self {
        self.chain.google = Some(google);
        self
    }

    #[must_use]
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    #[must_use]
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    #[must_use]
    pub fn cache_max_entries(mut self, max_entries: usize) -> Self {
        self.cache_max_entries = max_entries;
        self
    }

    #[must_use]
    pub fn build(self) -> AddressService {
        AddressService {
            inner: Arc::new(Inner {
                chain: self.chain,
                cache: SuggestionCache::new(self.cache_ttl, self.cache_max_entries),
                debouncer: Debouncer::new(self.debounce),
                health: ChainHealth::default(),
            }),
        }
    }
}
