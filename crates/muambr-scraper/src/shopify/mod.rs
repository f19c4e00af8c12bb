//! Extractor for Shopify storefronts via the public predictive-search JSON
//! endpoint (`/search/suggest.json`).

mod types;

use std::time::Duration;

use async_trait::async_trait;
use muambr_core::{parse_price, AppConfig, Country, ProductListing, StorefrontConfig};
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::extractor::Extractor;
use crate::retry::retry_with_backoff;

pub use types::{SuggestProduct, SuggestResponse};

/// Predictive search caps results per resource type at 10.
const RESULT_LIMIT: u32 = 10;

/// HTTP and retry settings shared by every storefront extractor.
#[derive(Debug, Clone)]
pub struct ScraperSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure, for transient errors only.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl ScraperSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.extractor_timeout_secs,
            user_agent: config.scraper_user_agent.clone(),
            max_retries: config.scraper_max_retries,
            backoff_base_ms: config.scraper_retry_backoff_base_ms,
        }
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn build_client(&self) -> Result<Client, ScraperError> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&self.user_agent)
            .build()?)
    }
}

/// One configured Shopify storefront.
pub struct ShopifySearchExtractor {
    client: Client,
    id: String,
    store_name: String,
    country: Country,
    currency: String,
    origin: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ShopifySearchExtractor {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidStoreUrl`] if the storefront's base URL
    /// has no usable origin.
    pub fn new(
        client: Client,
        storefront: &StorefrontConfig,
        settings: &ScraperSettings,
    ) -> Result<Self, ScraperError> {
        let origin = store_origin(&storefront.base_url)?;
        Ok(Self {
            client,
            id: storefront.id.clone(),
            store_name: storefront.name.clone(),
            country: storefront.country,
            currency: storefront.currency_code().to_string(),
            origin,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    fn search_url(&self, term: &str) -> Result<Url, ScraperError> {
        let mut url =
            self.origin
                .join("search/suggest.json")
                .map_err(|e| ScraperError::InvalidStoreUrl {
                    url: self.origin.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut()
            .append_pair("q", term)
            .append_pair("resources[type]", "product")
            .append_pair("resources[limit]", &RESULT_LIMIT.to_string());
        Ok(url)
    }

    async fn fetch_suggestions(&self, url: &Url) -> Result<SuggestResponse, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
            let response = self
                .client
                .get(url.clone())
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(ScraperError::RateLimited {
                    domain: url.host_str().unwrap_or_default().to_owned(),
                    retry_after_secs,
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ScraperError::NotFound {
                    url: url.to_string(),
                });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let body = response.text().await?;
            serde_json::from_str::<SuggestResponse>(&body).map_err(|e| {
                ScraperError::Deserialize {
                    context: format!("predictive search from {}", self.id),
                    source: e,
                }
            })
        })
        .await
    }

    fn to_listing(&self, product: SuggestProduct) -> Option<ProductListing> {
        if !product.available {
            tracing::debug!(store = %self.id, title = %product.title, "skipping unavailable product");
            return None;
        }

        let raw_price = product.price.as_deref().or(product.price_min.as_deref())?;
        let Some(price) = parse_price(raw_price) else {
            tracing::debug!(
                store = %self.id,
                title = %product.title,
                price = raw_price,
                "skipping product with unusable price"
            );
            return None;
        };

        let url = product
            .url
            .as_deref()
            .and_then(|path| self.origin.join(path).ok())
            .map(|mut url| {
                url.set_query(None);
                url.to_string()
            });

        Some(ProductListing {
            product_name: product.title,
            price,
            currency: self.currency.clone(),
            store_name: self.store_name.clone(),
            country: self.country.iso_code().to_string(),
            url,
            converted_price: None,
        })
    }
}

#[async_trait]
impl Extractor for ShopifySearchExtractor {
    fn country(&self) -> Country {
        self.country
    }

    fn identifier(&self) -> &str {
        &self.id
    }

    fn base_url(&self) -> &str {
        self.origin.as_str()
    }

    async fn fetch(&self, term: &str) -> Result<Vec<ProductListing>, ScraperError> {
        let url = self.search_url(term)?;
        let response = self.fetch_suggestions(&url).await?;

        let listings: Vec<ProductListing> = response
            .resources
            .results
            .products
            .into_iter()
            .filter_map(|product| self.to_listing(product))
            .collect();

        tracing::debug!(store = %self.id, term, count = listings.len(), "storefront search complete");
        Ok(listings)
    }
}

/// Scheme and host of `base_url`, with a trailing slash so relative paths join
/// onto the store root.
fn store_origin(base_url: &str) -> Result<Url, ScraperError> {
    let parsed = Url::parse(base_url).map_err(|e| ScraperError::InvalidStoreUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return Err(ScraperError::InvalidStoreUrl {
            url: base_url.to_owned(),
            reason: "URL has no host".to_string(),
        });
    }
    Url::parse(&format!("{}/", origin.ascii_serialization())).map_err(|e| {
        ScraperError::InvalidStoreUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        }
    })
}
