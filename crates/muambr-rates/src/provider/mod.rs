//! Remote exchange-rate sources.

mod exchange_rate_api;
mod frankfurter;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::ProviderError;

pub use exchange_rate_api::ExchangeRateApiProvider;
pub use frankfurter::FrankfurterProvider;

/// Multipliers from one base currency: `amount_in_base * table[to]`.
pub type RateTable = BTreeMap<String, f64>;

/// A remote source of exchange rates for a base currency.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Fetch every rate the provider knows for `base` (uppercase ISO 4217).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on any network, status, or payload failure.
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, ProviderError>;
}

/// Build the `reqwest` client shared by the rate providers.
///
/// # Errors
///
/// Returns [`ProviderError::Http`] if the client cannot be constructed.
pub fn build_http_client(timeout_secs: u64) -> Result<Client, ProviderError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent("muambr/0.1 (exchange-rates)")
        .build()?)
}

/// Validate `base_url` and strip any trailing slash so paths can be appended.
fn normalise_base_url(base_url: &str) -> Result<String, ProviderError> {
    let trimmed = base_url.trim_end_matches('/');
    Url::parse(trimmed).map_err(|_| ProviderError::InvalidBaseUrl {
        url: base_url.to_string(),
    })?;
    Ok(trimmed.to_string())
}

/// GET `url` and return the body, failing on non-2xx statuses.
async fn get_text(client: &Client, url: &str) -> Result<String, ProviderError> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}
