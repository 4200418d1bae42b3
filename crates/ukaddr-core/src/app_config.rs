#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for the address lookup service.
///
/// Every provider credential is optional: an absent key removes that
/// provider from the lookup chain instead of failing startup.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub mapbox_token: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub loqate_api_key: Option<String>,
    pub ideal_postcodes_api_key: Option<String>,
    pub royal_mail_api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub debounce_ms: u64,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
}

impl AppConfig {
    /// Returns `true` when at least one PAF-family credential is present.
    #[must_use]
    pub fn has_paf_credentials(&self) -> bool {
        self.loqate_api_key.is_some()
            || self.ideal_postcodes_api_key.is_some()
            || self.royal_mail_api_key.is_some()
    }
}

fn redact(key: Option<&String>) -> Option<&'static str> {
    key.map(|_| "[redacted]")
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("mapbox_token", &redact(self.mapbox_token.as_ref()))
            .field(
                "google_maps_api_key",
                &redact(self.google_maps_api_key.as_ref()),
            )
            .field("loqate_api_key", &redact(self.loqate_api_key.as_ref()))
            .field(
                "ideal_postcodes_api_key",
                &redact(self.ideal_postcodes_api_key.as_ref()),
            )
            .field(
                "royal_mail_api_key",
                &redact(self.royal_mail_api_key.as_ref()),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("debounce_ms", &self.debounce_ms)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_max_entries", &self.cache_max_entries)
            .finish()
    }
}
