use std::sync::Arc;

use muambr_core::{load_storefronts, AppConfig, ConfigError, CountrySection};
use muambr_rates::{ExchangeRateService, ProviderError};
use muambr_scraper::{ExtractorRegistry, ScraperError, ScraperSettings};
use thiserror::Error;

use crate::orchestrator::{CollectRequest, ExtractionOrchestrator, OrchestratorConfig};
use crate::processor::ComparisonProcessor;

/// Startup failures while wiring the pipeline from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("exchange rate providers: {0}")]
    Rates(#[from] ProviderError),

    #[error("extractors: {0}")]
    Extractors(#[from] ScraperError),
}

/// Extraction followed by ranking: the full comparison pipeline.
#[derive(Clone)]
pub struct ComparisonService {
    orchestrator: Arc<ExtractionOrchestrator>,
    processor: ComparisonProcessor,
}

impl ComparisonService {
    #[must_use]
    pub fn new(orchestrator: ExtractionOrchestrator, processor: ComparisonProcessor) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            processor,
        }
    }

    /// Wire storefront extractors, rate providers and the orchestrator from
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the storefront file is unreadable or invalid,
    /// or an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, BuildError> {
        let storefronts = load_storefronts(&config.storefronts_path)?;
        let registry =
            ExtractorRegistry::from_storefronts(&storefronts, &ScraperSettings::from_config(config))?;
        let rates = ExchangeRateService::from_config(config)?;
        let orchestrator = ExtractionOrchestrator::new(Arc::new(registry), rates)
            .with_config(OrchestratorConfig::from_config(config));
        Ok(Self::new(orchestrator, ComparisonProcessor::new()))
    }

    /// Ranked per-country sections for `request`, at most `limit` listings
    /// each (`0` keeps all).
    pub async fn search(&self, request: &CollectRequest, limit: usize) -> Vec<CountrySection> {
        let listings = self.orchestrator.collect(request).await;
        let total = listings.len();
        let sections = self.processor.process(listings, limit);
        tracing::info!(
            term = %request.term,
            base = %request.base_country,
            listings = total,
            sections = sections.len(),
            "comparison search complete"
        );
        sections
    }

    #[must_use]
    pub fn exchange_rates(&self) -> &ExchangeRateService {
        self.orchestrator.exchange_rates()
    }
}
