use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub storefronts_path: PathBuf,
    pub exchange_rate_api_key: Option<String>,
    pub rates_primary_url: String,
    pub rates_secondary_url: String,
    pub rates_timeout_secs: u64,
    pub extractor_timeout_secs: u64,
    pub request_deadline_secs: u64,
    pub extractor_max_concurrency: usize,
    pub scraper_user_agent: String,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("storefronts_path", &self.storefronts_path)
            .field(
                "exchange_rate_api_key",
                &self.exchange_rate_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("rates_primary_url", &self.rates_primary_url)
            .field("rates_secondary_url", &self.rates_secondary_url)
            .field("rates_timeout_secs", &self.rates_timeout_secs)
            .field("extractor_timeout_secs", &self.extractor_timeout_secs)
            .field("request_deadline_secs", &self.request_deadline_secs)
            .field("extractor_max_concurrency", &self.extractor_max_concurrency)
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_ms",
                &self.scraper_retry_backoff_base_ms,
            )
            .finish()
    }
}
