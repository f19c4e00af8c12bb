pub mod error;
pub mod extractor;
pub mod registry;
pub mod retry;
pub mod shopify;

pub use error::ScraperError;
pub use extractor::Extractor;
pub use registry::ExtractorRegistry;
pub use shopify::{ScraperSettings, ShopifySearchExtractor};
