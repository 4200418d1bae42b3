//! Running counters for each provider chain step and for the suggestion cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use ukaddr_core::ProviderFamily;

/// Steps whose error rate is above this are reported as unhealthy.
const MAX_HEALTHY_ERROR_RATE: f64 = 0.5;

#[derive(Debug, Default)]
struct StepCounters {
    attempts: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    latency_ms: AtomicU64,
}

/// Lock-free tallies updated by every lookup.
///
/// Counters only grow; take a [`HealthReport`] with [`ChainHealth::report`].
#[derive(Debug, Default)]
pub struct ChainHealth {
    paf: StepCounters,
    mapbox: StepCounters,
    google: StepCounters,
    local: StepCounters,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    fallback_answers: AtomicU64,
    unanswered: AtomicU64,
}

impl ChainHealth {
    fn step(&self, family: ProviderFamily) -> &StepCounters {
        match family {
            ProviderFamily::Paf => &self.paf,
            ProviderFamily::Mapbox => &self.mapbox,
            ProviderFamily::Google => &self.google,
            ProviderFamily::UkDatabase => &self.local,
        }
    }

    fn record_attempt(&self, family: ProviderFamily, elapsed: Duration) {
        let step = self.step(family);
        step.attempts.fetch_add(1, Ordering::Relaxed);
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        step.latency_ms.fetch_add(ms, Ordering::Relaxed);
    }

    /// A step answered. `after_fallthrough` is set when an earlier step was
    /// tried and handed the query on.
    pub(crate) fn record_success(
        &self,
        family: ProviderFamily,
        elapsed: Duration,
        after_fallthrough: bool,
    ) {
        self.record_attempt(family, elapsed);
        self.step(family).successes.fetch_add(1, Ordering::Relaxed);
        if after_fallthrough {
            self.fallback_answers.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// A step came back empty.
    pub(crate) fn record_empty(&self, family: ProviderFamily, elapsed: Duration) {
        self.record_attempt(family, elapsed);
    }

    /// A step returned an error.
    pub(crate) fn record_failure(&self, family: ProviderFamily, elapsed: Duration) {
        self.record_attempt(family, elapsed);
        self.step(family).failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Every step was exhausted without suggestions.
    pub(crate) fn record_unanswered(&self) {
        self.unanswered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache(&self, hit: bool) {
        let counter = if hit {
            &self.cache_hits
        } else {
            &self.cache_misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn report(&self) -> HealthReport {
        let providers = ProviderFamily::ALL
            .into_iter()
            .map(|family| ProviderStats::from_counters(family, self.step(family)))
            .collect();
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let cache_misses = self.cache_misses.load(Ordering::Relaxed);

        HealthReport {
            providers,
            requests: cache_hits + cache_misses,
            cache_hits,
            cache_misses,
            cache_hit_rate: ratio(cache_hits, cache_hits + cache_misses),
            fallback_answers: self.fallback_answers.load(Ordering::Relaxed),
            unanswered: self.unanswered.load(Ordering::Relaxed),
        }
    }
}

/// Totals for one chain step. Rates are fractions in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStats {
    pub family: ProviderFamily,
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    /// Attempts that handed the query to the next step, empty or failed.
    pub fallthroughs: u64,
    pub success_rate: f64,
    pub error_rate: f64,
    pub average_latency_ms: f64,
    pub healthy: bool,
}

impl ProviderStats {
    fn from_counters(family: ProviderFamily, counters: &StepCounters) -> Self {
        let attempts = counters.attempts.load(Ordering::Relaxed);
        let successes = counters.successes.load(Ordering::Relaxed);
        let failures = counters.failures.load(Ordering::Relaxed);
        let latency_ms = counters.latency_ms.load(Ordering::Relaxed);
        let error_rate = ratio(failures, attempts);

        Self {
            family,
            attempts,
            successes,
            failures,
            fallthroughs: attempts.saturating_sub(successes),
            success_rate: ratio(successes, attempts),
            error_rate,
            average_latency_ms: ratio(latency_ms, attempts),
            healthy: error_rate <= MAX_HEALTHY_ERROR_RATE,
        }
    }
}

/// Point-in-time view of [`ChainHealth`], ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub providers: Vec<ProviderStats>,
    /// Lookups that passed the length gate, cached or not.
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    /// Lookups answered by a step after an earlier one fell through.
    pub fallback_answers: u64,
    pub unanswered: u64,
}

impl HealthReport {
    #[must_use]
    pub fn provider(&self, family: ProviderFamily) -> Option<&ProviderStats> {
        self.providers.iter().find(|p| p.family == family)
    }

    /// Share of uncached lookups answered only after a fallthrough.
    #[must_use]
    pub fn fallback_rate(&self) -> f64 {
        ratio(self.fallback_answers, self.cache_misses)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(10);

    #[test]
    fn empty_report_has_zero_rates() {
        let report = ChainHealth::default().report();
        assert_eq!(report.providers.len(), 4);
        assert_eq!(report.requests, 0);
        assert!(report.cache_hit_rate.abs() < f64::EPSILON);
        assert!(report.providers.iter().all(|p| p.healthy));
    }

    #[test]
    fn step_outcomes_are_tallied_per_family() {
        let health = ChainHealth::default();
        health.record_failure(ProviderFamily::Mapbox, MS);
        health.record_failure(ProviderFamily::Mapbox, MS);
        health.record_empty(ProviderFamily::Mapbox, MS);
        health.record_success(ProviderFamily::Google, Duration::from_millis(30), true);

        let report = health.report();
        let mapbox = report.provider(ProviderFamily::Mapbox).expect("mapbox stats");
        assert_eq!(mapbox.attempts, 3);
        assert_eq!(mapbox.failures, 2);
        assert_eq!(mapbox.fallthroughs, 3);
        assert!(!mapbox.healthy);
        assert!((mapbox.average_latency_ms - 10.0).abs() < f64::EPSILON);

        let google = report.provider(ProviderFamily::Google).expect("google stats");
        assert_eq!(google.successes, 1);
        assert_eq!(google.fallthroughs, 0);
        assert!((google.success_rate - 1.0).abs() < f64::EPSILON);
        assert_eq!(report.fallback_answers, 1);
    }

    #[test]
    fn cache_hit_rate_counts_hits_over_lookups() {
        let health = ChainHealth::default();
        health.record_cache(false);
        health.record_cache(true);
        health.record_cache(true);
        health.record_cache(true);

        let report = health.report();
        assert_eq!(report.requests, 4);
        assert!((report.cache_hit_rate - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn report_serializes_family_names() {
        let health = ChainHealth::default();
        health.record_success(ProviderFamily::UkDatabase, MS, false);
        let json = serde_json::to_value(health.report()).expect("serialize report");
        assert_eq!(json["providers"][3]["family"], "uk-database");
        assert_eq!(json["providers"][3]["successes"], 1);
    }
}
