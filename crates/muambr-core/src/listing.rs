use serde::{Deserialize, Serialize};

/// Bucket name for listings whose country code is empty.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// A price converted into the caller's display currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedPrice {
    pub amount: f64,
    /// ISO 4217 code of `amount`.
    pub currency: String,
}

/// One product offer found by an extractor.
///
/// Extractors build these; the orchestrator derives annotated copies and the
/// comparison processor only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListing {
    pub product_name: String,
    /// Price in `currency`, always positive.
    pub price: f64,
    /// ISO 4217 code, e.g. `"BRL"`.
    pub currency: String,
    pub store_name: String,
    /// ISO country code of the store. Empty when the source did not say.
    pub country: String,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub converted_price: Option<ConvertedPrice>,
}

impl ProductListing {
    /// The converted amount when present, otherwise the raw price.
    #[must_use]
    pub fn effective_price(&self) -> f64 {
        self.converted_price
            .as_ref()
            .map_or(self.price, |converted| converted.amount)
    }

    /// Returns a copy with `suffix` appended to the store name.
    #[must_use]
    pub fn with_store_suffix(&self, suffix: &str) -> Self {
        Self {
            store_name: format!("{}{suffix}", self.store_name),
            ..self.clone()
        }
    }

    /// Returns a copy carrying `converted`.
    #[must_use]
    pub fn with_converted_price(self, converted: ConvertedPrice) -> Self {
        Self {
            converted_price: Some(converted),
            ..self
        }
    }
}

/// Ranked listings for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySection {
    pub country: String,
    pub country_name: String,
    pub comparisons: Vec<ProductListing>,
    pub results_count: usize,
}
