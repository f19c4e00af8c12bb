use async_trait::async_trait;
use muambr_core::{Country, MacroRegion, ProductListing};

use crate::error::ScraperError;

/// A per-country source of product listings.
///
/// Implementations are registered once at startup and shared across requests,
/// so `fetch` must be safe to call concurrently.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// The country whose stores this extractor covers.
    fn country(&self) -> Country;

    fn macro_region(&self) -> MacroRegion {
        self.country().macro_region()
    }

    /// Stable identifier, unique among registered extractors.
    fn identifier(&self) -> &str;

    fn base_url(&self) -> &str;

    /// Search the source for `term`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] when the source cannot be queried or its
    /// response cannot be understood.
    async fn fetch(&self, term: &str) -> Result<Vec<ProductListing>, ScraperError>;
}
