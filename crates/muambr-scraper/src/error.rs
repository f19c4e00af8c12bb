use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid store URL \"{url}\": {reason}")]
    InvalidStoreUrl { url: String, reason: String },

    /// The extractor did not answer within its time budget.
    #[error("extractor {extractor} timed out after {timeout_ms}ms")]
    Timeout { extractor: String, timeout_ms: u64 },

    /// Any other extractor-specific failure.
    #[error("extractor {extractor} failed: {reason}")]
    Extraction { extractor: String, reason: String },
}
