use thiserror::Error;

/// Errors returned by the provider clients.
///
/// None of these are fatal to a search: the lookup chain logs them and
/// moves on to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider was called without its API key or token.
    #[error("{provider} is not configured: missing {credential}")]
    MissingCredential {
        provider: &'static str,
        credential: &'static str,
    },

    /// Network or TLS failure from the underlying HTTP client. The request
    /// URL is stripped because it carries the API key.
    #[error("HTTP error from {provider}: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {provider}")]
    UnexpectedStatus { provider: &'static str, status: u16 },

    /// The provider rejected the credential (Mapbox answers 401).
    #[error("{provider} credential rejected: {message}")]
    InvalidToken {
        provider: &'static str,
        message: String,
    },

    /// The provider answered 2xx but reported a failure in the body.
    #[error("{provider} API error: {status}")]
    ApiStatus {
        provider: &'static str,
        status: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ProviderError {
    pub(crate) fn http(provider: &'static str, source: reqwest::Error) -> Self {
        ProviderError::Http {
            provider,
            source: source.without_url(),
        }
    }
}
