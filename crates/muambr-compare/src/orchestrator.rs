//! Fan-out of a search across the extractors selected for a request.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use muambr_core::{AppConfig, ConvertedPrice, Country, ProductListing};
use muambr_rates::ExchangeRateService;
use muambr_scraper::{Extractor, ExtractorRegistry, ScraperError};
use tokio::time::{timeout, timeout_at, Instant};

use crate::labels::{ContextLabels, EnglishLabels};

#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    /// Extractors running at the same time.
    pub max_concurrency: usize,
    /// Budget for a single extractor call.
    pub extractor_timeout: Duration,
    /// Budget for the whole fan-out. Results completed before it are kept.
    pub request_deadline: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            extractor_timeout: Duration::from_secs(30),
            request_deadline: Duration::from_secs(45),
        }
    }
}

impl OrchestratorConfig {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_concurrency: config.extractor_max_concurrency,
            extractor_timeout: Duration::from_secs(config.extractor_timeout_secs),
            request_deadline: Duration::from_secs(config.request_deadline_secs),
        }
    }
}

/// One comparison search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectRequest {
    pub term: String,
    pub base_country: Country,
    pub current_country: Option<Country>,
    /// Display currency. Listings in another currency get a converted price.
    pub target_currency: Option<String>,
    /// Search the whole macro-region of `current_country` instead of only it.
    pub use_macro_region: bool,
}

impl CollectRequest {
    #[must_use]
    pub fn new(term: impl Into<String>, base_country: Country) -> Self {
        Self {
            term: term.into(),
            base_country,
            current_country: None,
            target_currency: None,
            use_macro_region: false,
        }
    }

    /// The current country when it differs from the base country.
    fn foreign_current(&self) -> Option<Country> {
        self.current_country
            .filter(|current| *current != self.base_country)
    }
}

type Outcome = Result<Vec<ProductListing>, ScraperError>;

pub struct ExtractionOrchestrator {
    registry: Arc<ExtractorRegistry>,
    rates: ExchangeRateService,
    labels: Arc<dyn ContextLabels>,
    config: OrchestratorConfig,
}

impl ExtractionOrchestrator {
    #[must_use]
    pub fn new(registry: Arc<ExtractorRegistry>, rates: ExchangeRateService) -> Self {
        Self {
            registry,
            rates,
            labels: Arc::new(EnglishLabels),
            config: OrchestratorConfig::default(),
        }
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Arc<dyn ContextLabels>) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn exchange_rates(&self) -> &ExchangeRateService {
        &self.rates
    }

    /// Extractors for the base country, then for the current country or its
    /// macro-region, without repeating an identifier.
    #[must_use]
    pub fn select_extractors(&self, request: &CollectRequest) -> Vec<Arc<dyn Extractor>> {
        let mut selected = self.registry.for_country(request.base_country);

        if let Some(current) = request.foreign_current() {
            if request.use_macro_region {
                selected.extend(self.registry.for_macro_region(current.macro_region()));
            } else {
                selected.extend(self.registry.for_country(current));
            }
        }

        let mut seen = HashSet::new();
        selected.retain(|extractor| seen.insert(extractor.identifier().to_string()));
        selected
    }

    /// Run every selected extractor and return their annotated listings.
    ///
    /// Failed or timed-out extractors are logged and skipped; an empty result
    /// is a valid outcome.
    pub async fn collect(&self, request: &CollectRequest) -> Vec<ProductListing> {
        let extractors = self.select_extractors(request);
        if extractors.is_empty() {
            tracing::info!(
                base = %request.base_country,
                current = ?request.current_country,
                "no extractors registered for request"
            );
            return Vec::new();
        }

        let merged = self.fan_out(&extractors, &request.term).await;

        futures::future::join_all(
            merged
                .into_iter()
                .map(|listing| self.contextualize(listing, request)),
        )
        .await
    }

    async fn fan_out(&self, extractors: &[Arc<dyn Extractor>], term: &str) -> Vec<ProductListing> {
        let deadline = Instant::now() + self.config.request_deadline;
        let per_extractor = self.config.extractor_timeout;

        let tasks: Vec<_> = extractors
            .iter()
            .cloned()
            .enumerate()
            .map(move |(index, extractor)| async move {
                let outcome: Outcome = match timeout(per_extractor, extractor.fetch(term)).await {
                    Ok(result) => result,
                    Err(_) => Err(ScraperError::Timeout {
                        extractor: extractor.identifier().to_string(),
                        timeout_ms: u64::try_from(per_extractor.as_millis()).unwrap_or(u64::MAX),
                    }),
                };
                (index, extractor, outcome)
            })
            .collect();
        let mut pending = stream::iter(tasks).buffer_unordered(self.config.max_concurrency.max(1));

        let mut completed: Vec<(usize, Vec<ProductListing>)> = Vec::with_capacity(extractors.len());
        let mut finished = 0usize;

        loop {
            match timeout_at(deadline, pending.next()).await {
                Ok(Some((index, extractor, outcome))) => {
                    finished += 1;
                    match outcome {
                        Ok(listings) => {
                            tracing::debug!(
                                extractor = extractor.identifier(),
                                count = listings.len(),
                                "extractor finished"
                            );
                            completed.push((index, listings));
                        }
                        Err(e) => {
                            tracing::warn!(
                                extractor = extractor.identifier(),
                                country = %extractor.country(),
                                error = %e,
                                "extractor failed, skipping"
                            );
                        }
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!(
                        deadline_ms = u64::try_from(self.config.request_deadline.as_millis())
                            .unwrap_or(u64::MAX),
                        finished,
                        abandoned = extractors.len() - finished,
                        "request deadline reached, keeping completed results"
                    );
                    break;
                }
            }
        }

        completed.sort_by_key(|(index, _)| *index);
        completed
            .into_iter()
            .flat_map(|(_, listings)| listings)
            .collect()
    }

    /// Annotate the store name with country context and convert the price
    /// into the requested currency.
    async fn contextualize(&self, listing: ProductListing, request: &CollectRequest) -> ProductListing {
        let mut suffix = self.labels.available_for(request.base_country);
        if let Some(current) = request.foreign_current() {
            suffix.push_str(&self.labels.browsing_from(current));
        }
        let annotated = listing.with_store_suffix(&suffix);

        let Some(target) = request
            .target_currency
            .as_deref()
            .filter(|target| !target.eq_ignore_ascii_case(&annotated.currency))
        else {
            return annotated;
        };

        match self
            .rates
            .convert_currency(annotated.price, &annotated.currency, target)
            .await
        {
            Ok(amount) => annotated.with_converted_price(ConvertedPrice {
                amount: round_to_cents(amount),
                currency: target.to_ascii_uppercase(),
            }),
            Err(e) => {
                tracing::warn!(
                    store = %annotated.store_name,
                    from = %annotated.currency,
                    to = target,
                    error = %e,
                    "price conversion failed, keeping original price"
                );
                annotated
            }
        }
    }
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
