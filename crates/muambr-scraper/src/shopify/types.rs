use serde::Deserialize;

/// Envelope of Shopify's `search/suggest.json` predictive-search endpoint.
#[derive(Debug, Deserialize)]
pub struct SuggestResponse {
    pub resources: SuggestResources,
}

#[derive(Debug, Deserialize)]
pub struct SuggestResources {
    pub results: SuggestResults,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestResults {
    #[serde(default)]
    pub products: Vec<SuggestProduct>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestProduct {
    pub title: String,
    /// Decimal string in the store currency, e.g. `"129.90"`.
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub price_min: Option<String>,
    /// Store-relative path, usually with tracking query parameters.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}
