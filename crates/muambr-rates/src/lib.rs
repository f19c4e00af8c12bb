//! Currency conversion for price listings.
//!
//! [`ExchangeRateService`] keeps an in-memory rate table per base currency,
//! refreshed from remote [`RateProvider`]s and backed by a static fallback
//! table when every provider is unavailable.

pub mod clock;
pub mod error;
pub mod fallback;
pub mod provider;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConversionError, ProviderError};
pub use fallback::fallback_rates;
pub use muambr_core::parse_price;
pub use provider::{
    build_http_client, ExchangeRateApiProvider, FrankfurterProvider, RateProvider, RateTable,
};
pub use service::{ExchangeRateService, RATE_TTL_SECS};
