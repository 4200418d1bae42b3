//! Address lookup provider clients and their result normalizers.
//!
//! Each provider module owns an HTTP client for one upstream API and a
//! normalizer that converts the provider's native response into
//! [`ukaddr_core::AddressSuggestion`]. The local database needs no network
//! and is always available.

pub mod error;
pub mod google;
pub mod http;
pub mod local_db;
pub mod mapbox;
pub mod paf;
pub mod postcodes_io;

pub use error::ProviderError;
pub use google::GooglePlacesClient;
pub use http::build_client;
pub use mapbox::MapboxClient;
pub use paf::{IdealPostcodesClient, LoqateClient, PafAddress, PafClient, RoyalMailClient};
pub use postcodes_io::{PostcodeLookup, PostcodesIoClient};
