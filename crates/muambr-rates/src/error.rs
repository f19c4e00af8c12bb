use thiserror::Error;

/// Failure of a single remote rate provider. Absorbed by the service's
/// fallback chain, never returned from a rate lookup.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network or TLS failure, or a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider needs an API key and none was configured.
    #[error("no API key configured for {0}")]
    MissingApiKey(&'static str),

    /// The provider answered but reported an error in its payload.
    #[error("rate API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}'")]
    InvalidBaseUrl { url: String },
}

/// Errors from the direct conversion API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("invalid price format: '{0}'")]
    InvalidPrice(String),

    #[error("exchange rate not found for {from} to {to}")]
    RateNotFound { from: String, to: String },
}
