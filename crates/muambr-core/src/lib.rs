pub mod app_config;
pub mod config;
pub mod country;
pub mod error;
pub mod listing;
pub mod price;
pub mod storefronts;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use country::{Country, MacroRegion};
pub use error::{ConfigError, ValidationError};
pub use listing::{ConvertedPrice, CountrySection, ProductListing, UNKNOWN_COUNTRY};
pub use price::{is_currency_code, parse_price};
pub use storefronts::{load_storefronts, StorefrontConfig, StorefrontsFile};
