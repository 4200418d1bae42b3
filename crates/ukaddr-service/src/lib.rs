//! Address autocomplete service: a provider fallback chain behind a
//! bounded TTL cache and a debounce gate.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ukaddr_core::load_app_config()?;
//! let service = ukaddr_service::AddressService::from_config(&config)?;
//! let suggestions = service.search("ML3 0HS", Default::default()).await;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod chain;
pub mod debounce;
pub mod error;
pub mod health;
pub mod service;

pub use cache::{CacheStats, SuggestionCache};
pub use chain::ProviderChain;
pub use debounce::Debouncer;
pub use error::ServiceError;
pub use health::{ChainHealth, HealthReport, ProviderStats};
pub use service::{AddressService, AddressServiceBuilder};
