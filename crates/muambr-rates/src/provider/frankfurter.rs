use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_text, normalise_base_url, RateProvider, RateTable};
use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    rates: RateTable,
}

/// Unauthenticated provider backed by the ECB reference rates on frankfurter.app.
pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
    /// # Errors
    ///
    /// Never fails for the built-in URL; see [`Self::with_base_url`].
    pub fn new(client: Client) -> Result<Self, ProviderError> {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(client: Client, base_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            client,
            base_url: normalise_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn name(&self) -> &'static str {
        "frankfurter"
    }

    async fn fetch_rates(&self, base: &str) -> Result<RateTable, ProviderError> {
        let url = format!("{}/latest?from={base}", self.base_url);
        let body = get_text(&self.client, &url).await?;

        let parsed: LatestResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
                context: format!("frankfurter latest({base})"),
                source: e,
            })?;

        if !parsed.base.eq_ignore_ascii_case(base) {
            return Err(ProviderError::Api(format!(
                "asked for base {base}, got {}",
                parsed.base
            )));
        }

        let mut rates = parsed.rates;
        if rates.is_empty() {
            return Err(ProviderError::Api(format!(
                "empty rate table for base {base}"
            )));
        }
        rates.entry(base.to_string()).or_insert(1.0);

        Ok(rates)
    }
}
