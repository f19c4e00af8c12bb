use thiserror::Error;

/// Errors raised while loading configuration or the storefront file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read storefronts file {path}: {source}")]
    StorefrontsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse storefronts file: {0}")]
    StorefrontsFileParse(#[from] serde_yaml::Error),

    #[error("storefront validation error: {0}")]
    Validation(String),
}

/// Bad or missing request input. Surfaced to the caller as-is, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("product name is required")]
    MissingSearchTerm,

    #[error("base country ISO code is required (e.g., {})", supported_codes())]
    MissingBaseCountry,

    #[error("invalid country ISO code '{code}'. Supported codes: {}", supported_codes())]
    InvalidCountry { code: String },

    #[error("invalid currency code '{code}': expected a 3-letter ISO 4217 code")]
    InvalidCurrency { code: String },
}

fn supported_codes() -> String {
    crate::Country::ALL
        .iter()
        .map(|c| c.iso_code())
        .collect::<Vec<_>>()
        .join(", ")
}
