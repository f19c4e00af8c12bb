use std::collections::BTreeMap;
use std::sync::Arc;

use muambr_core::{Country, MacroRegion, StorefrontsFile};

use crate::error::ScraperError;
use crate::extractor::Extractor;
use crate::shopify::{ScraperSettings, ShopifySearchExtractor};

/// Lookup from country to the extractors registered for it.
///
/// Built once at startup; lookups never fail and return an empty list when
/// nothing is registered.
#[derive(Default, Clone)]
pub struct ExtractorRegistry {
    by_country: BTreeMap<Country, Vec<Arc<dyn Extractor>>>,
}

impl ExtractorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One [`ShopifySearchExtractor`] per configured storefront, sharing a
    /// single HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if the HTTP client cannot be built or a
    /// storefront URL has no usable origin.
    pub fn from_storefronts(
        file: &StorefrontsFile,
        settings: &ScraperSettings,
    ) -> Result<Self, ScraperError> {
        let client = settings.build_client()?;
        let mut registry = Self::new();
        for storefront in &file.storefronts {
            let extractor = ShopifySearchExtractor::new(client.clone(), storefront, settings)?;
            registry.register(Arc::new(extractor));
        }
        tracing::info!(
            extractors = registry.len(),
            countries = registry.supported_countries().len(),
            "extractor registry built"
        );
        Ok(registry)
    }

    /// Adds `extractor` under its declared country. Identifiers are not checked.
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) {
        self.by_country
            .entry(extractor.country())
            .or_default()
            .push(extractor);
    }

    #[must_use]
    pub fn for_country(&self, country: Country) -> Vec<Arc<dyn Extractor>> {
        self.by_country.get(&country).cloned().unwrap_or_default()
    }

    /// Extractors of every country in `region`, in the region's country order.
    #[must_use]
    pub fn for_macro_region(&self, region: MacroRegion) -> Vec<Arc<dyn Extractor>> {
        region
            .countries()
            .into_iter()
            .flat_map(|country| self.for_country(country))
            .collect()
    }

    /// Countries with at least one extractor, sorted by ISO code.
    #[must_use]
    pub fn supported_countries(&self) -> Vec<Country> {
        let mut countries: Vec<Country> = self
            .by_country
            .iter()
            .filter(|(_, extractors)| !extractors.is_empty())
            .map(|(country, _)| *country)
            .collect();
        countries.sort_by_key(|country| country.iso_code());
        countries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_country.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
