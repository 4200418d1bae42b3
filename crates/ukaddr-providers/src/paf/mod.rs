//! Postcode Address File (PAF) lookups.
//!
//! Three commercial backends expose Royal Mail PAF data. [`PafClient`] holds
//! whichever of them have credentials and asks each in turn (Loqate, Ideal
//! Postcodes, Royal Mail) until one returns addresses.

mod heuristics;
mod ideal;
mod loqate;
mod royal_mail;
pub mod types;

use reqwest::Client;
use ukaddr_core::{AddressSuggestion, AppConfig, ClassifiedQuery};

pub use heuristics::{determine_building_type, extract_sub_building};
pub use ideal::IdealPostcodesClient;
pub use loqate::LoqateClient;
pub use royal_mail::RoyalMailClient;
pub use types::{PafAddress, PafSource};

use crate::error::ProviderError;

/// Facade over the configured PAF backends.
#[derive(Default)]
pub struct PafClient {
    loqate: Option<LoqateClient>,
    ideal: Option<IdealPostcodesClient>,
    royal_mail: Option<RoyalMailClient>,
}

impl PafClient {
    /// Builds the facade from whichever keys are present in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidBaseUrl`] only if a built-in base URL
    /// fails to parse.
    pub fn from_config(client: &Client, config: &AppConfig) -> Result<Self, ProviderError> {
        let mut paf = Self::default();
        if let Some(key) = config.loqate_api_key.as_deref() {
            paf = paf.with_loqate(LoqateClient::new(client.clone(), key)?);
        }
        if let Some(key) = config.ideal_postcodes_api_key.as_deref() {
            paf = paf.with_ideal_postcodes(IdealPostcodesClient::new(client.clone(), key)?);
        }
        if let Some(key) = config.royal_mail_api_key.as_deref() {
            paf = paf.with_royal_mail(RoyalMailClient::new(client.clone(), key)?);
        }
        Ok(paf)
    }

    #[must_use]
    pub fn with_loqate(mut self, client: LoqateClient) -> Self {
        self.loqate = Some(client);
        self
    }

    #[must_use]
    pub fn with_ideal_postcodes(mut self, client: IdealPostcodesClient) -> Self {
        self.ideal = Some(client);
        self
    }

    #[must_use]
    pub fn with_royal_mail(mut self, client: RoyalMailClient) -> Self {
        self.royal_mail = Some(client);
        self
    }

    /// True when at least one backend has credentials.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.loqate.is_some() || self.ideal.is_some() || self.royal_mail.is_some()
    }

    /// Asks each configured backend in turn and returns the first non-empty
    /// answer. A failing backend is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingCredential`] when no backend is
    /// configured. Backend failures are never returned.
    pub async fn search(
        &self,
        query: &ClassifiedQuery,
        limit: u32,
    ) -> Result<Vec<PafAddress>, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::MissingCredential {
                provider: "paf",
                credential: "LOQATE_API_KEY, IDEAL_POSTCODES_API_KEY or ROYAL_MAIL_API_KEY",
            });
        }

        if let Some(loqate) = &self.loqate {
            match loqate.search(query, limit).await {
                Ok(found) if !found.is_empty() => return Ok(found),
                Ok(_) => {}
                Err(e) => tracing::warn!(backend = "loqate", error = %e, "PAF lookup failed"),
            }
        }

        if let Some(ideal) = &self.ideal {
            match ideal.search(query).await {
                Ok(found) if !found.is_empty() => return Ok(found),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(backend = "ideal-postcodes", error = %e, "PAF lookup failed");
                }
            }
        }

        if let Some(royal_mail) = &self.royal_mail {
            match royal_mail.search(query, limit).await {
                Ok(found) if !found.is_empty() => return Ok(found),
                Ok(_) => {}
                Err(e) => tracing::warn!(backend = "royal-mail", error = %e, "PAF lookup failed"),
            }
        }

        Ok(vec![])
    }

    /// Like [`PafClient::search`], normalized into suggestions.
    ///
    /// # Errors
    ///
    /// See [`PafClient::search`].
    pub async fn search_suggestions(
        &self,
        query: &ClassifiedQuery,
        limit: u32,
    ) -> Result<Vec<AddressSuggestion>, ProviderError> {
        let found = self.search(query, limit).await?;
        Ok(found
            .into_iter()
            .map(|addr| addr.into_suggestion(query.search_type))
            .collect())
    }
}
