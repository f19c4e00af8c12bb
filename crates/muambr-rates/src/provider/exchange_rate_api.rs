use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_text, normalise_base_url, RateProvider, RateTable};
use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: RateTable,
}

/// Authenticated provider backed by exchangerate-api.com.
pub struct ExchangeRateApiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl ExchangeRateApiProvider {
    /// Provider pointed at the production API.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in URL; see [`Self::with_base_url`].
    pub fn new(client: Client, api_key: Option<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(client, api_key, DEFAULT_BASE_URL)
    }

    /// Provider with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        client: Client,
        api_key: Option<String>,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client,
            api_key,
            base_url: normalise_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &'static str {
        "exchangerate-api"
    }

    async fn fetch_rates(&self, base: &str) -> Result<RateTable, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(self.name()))?;

        let url = format!("{}/{api_key}/latest/{base}", self.base_url);
        let body = get_text(&self.client, &url).await?;

        let parsed: LatestResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
                context: format!("exchangerate-api latest({base})"),
                source: e,
            })?;

        if parsed.result != "success" {
            return Err(ProviderError::Api(format!(
                "result '{}'{}",
                parsed.result,
                parsed
                    .error_type
                    .map(|kind| format!(" ({kind})"))
                    .unwrap_or_default()
            )));
        }

        if parsed.conversion_rates.is_empty() {
            return Err(ProviderError::Api(format!(
                "empty rate table for base {base}"
            )));
        }

        Ok(parsed.conversion_rates)
    }
}
