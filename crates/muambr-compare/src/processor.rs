use std::collections::BTreeMap;

use muambr_core::{Country, CountrySection, ProductListing, UNKNOWN_COUNTRY};

/// Listings cheaper than this share of the mean effective price are dropped.
pub const DEFAULT_OUTLIER_FACTOR: f64 = 0.6;

/// Turns a merged listing set into ranked per-country sections.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonProcessor {
    outlier_factor: f64,
}

impl Default for ComparisonProcessor {
    fn default() -> Self {
        Self {
            outlier_factor: DEFAULT_OUTLIER_FACTOR,
        }
    }
}

impl ComparisonProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the outlier factor. Values outside `(0, 1]` are ignored.
    #[must_use]
    pub fn with_outlier_factor(mut self, factor: f64) -> Self {
        if factor > 0.0 && factor <= 1.0 {
            self.outlier_factor = factor;
        } else {
            tracing::warn!(factor, "ignoring outlier factor outside (0, 1]");
        }
        self
    }

    #[must_use]
    pub fn outlier_factor(&self) -> f64 {
        self.outlier_factor
    }

    /// Filter outliers, group by country, rank by effective price and keep at
    /// most `limit` listings per country (`0` keeps all).
    ///
    /// Sections come back sorted by country code.
    #[must_use]
    pub fn process(&self, listings: Vec<ProductListing>, limit: usize) -> Vec<CountrySection> {
        let filtered = self.filter_outliers(listings);

        let mut groups: BTreeMap<String, Vec<ProductListing>> = BTreeMap::new();
        for listing in filtered {
            let key = if listing.country.is_empty() {
                UNKNOWN_COUNTRY.to_string()
            } else {
                listing.country.clone()
            };
            groups.entry(key).or_default().push(listing);
        }

        groups
            .into_iter()
            .map(|(country, mut comparisons)| {
                comparisons.sort_by(|a, b| a.effective_price().total_cmp(&b.effective_price()));
                if limit > 0 {
                    comparisons.truncate(limit);
                }
                CountrySection {
                    country_name: Country::display_name_for(&country),
                    country,
                    results_count: comparisons.len(),
                    comparisons,
                }
            })
            .collect()
    }

    fn filter_outliers(&self, listings: Vec<ProductListing>) -> Vec<ProductListing> {
        if listings.len() <= 2 {
            return listings;
        }

        let positive: Vec<f64> = listings
            .iter()
            .map(ProductListing::effective_price)
            .filter(|price| *price > 0.0)
            .collect();
        if positive.is_empty() {
            return listings;
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = positive.iter().sum::<f64>() / positive.len() as f64;
        let threshold = mean * self.outlier_factor;

        listings
            .into_iter()
            .filter(|listing| {
                let price = listing.effective_price();
                let keep = price >= threshold;
                if !keep {
                    tracing::debug!(
                        product = %listing.product_name,
                        store = %listing.store_name,
                        country = %listing.country,
                        effective_price = price,
                        mean,
                        threshold,
                        "dropping price outlier"
                    );
                }
                keep
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "processor_test.rs"]
mod tests;
