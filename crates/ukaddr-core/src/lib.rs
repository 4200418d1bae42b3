pub mod app_config;
pub mod config;
pub mod postcode;
pub mod suggestion;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use postcode::{
    canonical_postcode, classify, extract_postcode, format_uk_postcode, is_uk_address_query,
    is_valid_uk_postcode, ClassifiedQuery, SearchType, MIN_QUERY_LEN,
};
pub use suggestion::{
    AddressSuggestion, BuildingType, Coordinates, PlaceIcon, ProviderFamily, ProviderTag,
    SearchOptions, StructuredAddress, DEFAULT_LIMIT,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
