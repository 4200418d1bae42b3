use thiserror::Error;
use ukaddr_providers::ProviderError;

/// Failures while wiring up the service. Searches themselves never fail.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("provider setup failed: {0}")]
    Provider(#[from] ProviderError),
}
