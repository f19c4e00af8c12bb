use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use muambr_core::{parse_price, AppConfig};
use parking_lot::{Mutex, RwLock};

use crate::clock::{Clock, SystemClock};
use crate::error::{ConversionError, ProviderError};
use crate::fallback::fallback_rates;
use crate::provider::{
    build_http_client, ExchangeRateApiProvider, FrankfurterProvider, RateProvider, RateTable,
};

/// Seconds a fetched rate table stays fresh (5 hours).
pub const RATE_TTL_SECS: i64 = 5 * 60 * 60;

type InflightFetch = Shared<BoxFuture<'static, RateTable>>;

#[derive(Debug, Clone)]
struct CachedRate {
    rates: RateTable,
    fetched_at: DateTime<Utc>,
}

struct Inner {
    providers: Vec<Arc<dyn RateProvider>>,
    clock: Arc<dyn Clock>,
    cache: RwLock<HashMap<String, CachedRate>>,
    inflight: Mutex<HashMap<String, InflightFetch>>,
}

/// Exchange-rate cache shared by every request.
///
/// Cloning is cheap and clones share one cache.
#[derive(Clone)]
pub struct ExchangeRateService {
    inner: Arc<Inner>,
}

impl ExchangeRateService {
    /// Service that tries `providers` in order on every cache miss.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn RateProvider>>) -> Self {
        Self::with_clock(providers, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(providers: Vec<Arc<dyn RateProvider>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                providers,
                clock,
                cache: RwLock::new(HashMap::new()),
                inflight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Primary (keyed) provider followed by the unauthenticated secondary.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP client cannot be built or a
    /// configured base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let client = build_http_client(config.rates_timeout_secs)?;
        let primary = ExchangeRateApiProvider::with_base_url(
            client.clone(),
            config.exchange_rate_api_key.clone(),
            &config.rates_primary_url,
        )?;
        let secondary = FrankfurterProvider::with_base_url(client, &config.rates_secondary_url)?;
        Ok(Self::new(vec![Arc::new(primary), Arc::new(secondary)]))
    }

    /// Rates from `base` to every known currency.
    ///
    /// Never fails: a fresh cache entry wins, then a remote fetch, then a
    /// stale entry, then the static fallback table. Concurrent misses for the
    /// same base share one fetch.
    pub async fn rates(&self, base: &str) -> RateTable {
        let base = base.trim().to_ascii_uppercase();
        if let Some(rates) = self.inner.fresh_rates(&base) {
            return rates;
        }

        let fetch = {
            let mut inflight = self.inner.inflight.lock();
            // A fetch may have completed between the cache read and taking the lock.
            if let Some(rates) = self.inner.fresh_rates(&base) {
                return rates;
            }
            inflight
                .entry(base.clone())
                .or_insert_with(|| {
                    let inner = Arc::clone(&self.inner);
                    let base = base.clone();
                    async move { inner.refresh(base).await }.boxed().shared()
                })
                .clone()
        };

        fetch.await
    }

    /// Convert `amount` from one currency to another.
    ///
    /// Equal currencies return `amount` without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::RateNotFound`] if the resolved table for
    /// `from` has no entry for `to`.
    pub async fn convert_currency(
        &self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<f64, ConversionError> {
        if from.trim().eq_ignore_ascii_case(to.trim()) {
            return Ok(amount);
        }

        let to_code = to.trim().to_ascii_uppercase();
        let rates = self.rates(from).await;
        rates
            .get(&to_code)
            .map(|rate| amount * rate)
            .ok_or_else(|| ConversionError::RateNotFound {
                from: from.trim().to_ascii_uppercase(),
                to: to_code,
            })
    }

    /// Parse a localized price string, convert it, and format with two decimals.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::InvalidPrice`] if the string does not parse
    /// to a positive amount, or [`ConversionError::RateNotFound`].
    pub async fn convert_price_string(
        &self,
        price: &str,
        from: &str,
        to: &str,
    ) -> Result<String, ConversionError> {
        let amount =
            parse_price(price).ok_or_else(|| ConversionError::InvalidPrice(price.to_string()))?;
        let converted = self.convert_currency(amount, from, to).await?;
        Ok(format!("{converted:.2}"))
    }

    /// Fetch time of every cached base currency, fresh or stale.
    #[must_use]
    pub fn cache_status(&self) -> BTreeMap<String, DateTime<Utc>> {
        self.inner
            .cache
            .read()
            .iter()
            .map(|(base, entry)| (base.clone(), entry.fetched_at))
            .collect()
    }

    pub fn clear_cache(&self) {
        self.inner.cache.write().clear();
        tracing::info!("exchange rate cache cleared");
    }
}

impl Inner {
    fn fresh_rates(&self, base: &str) -> Option<RateTable> {
        let now = self.clock.now();
        let cache = self.cache.read();
        cache
            .get(base)
            .filter(|entry| (now - entry.fetched_at).num_seconds() < RATE_TTL_SECS)
            .map(|entry| entry.rates.clone())
    }

    async fn refresh(self: Arc<Self>, base: String) -> RateTable {
        let rates = self.resolve(&base).await;
        self.inflight.lock().remove(&base);
        rates
    }

    async fn resolve(&self, base: &str) -> RateTable {
        for provider in &self.providers {
            match provider.fetch_rates(base).await {
                Ok(rates) => {
                    tracing::info!(
                        provider = provider.name(),
                        base,
                        count = rates.len(),
                        "fetched exchange rates"
                    );
                    self.cache.write().insert(
                        base.to_string(),
                        CachedRate {
                            rates: rates.clone(),
                            fetched_at: self.clock.now(),
                        },
                    );
                    return rates;
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        base,
                        error = %e,
                        "exchange rate provider failed"
                    );
                }
            }
        }

        if let Some(stale) = self.cache.read().get(base) {
            tracing::warn!(
                base,
                fetched_at = %stale.fetched_at,
                "all rate providers failed; serving stale rates"
            );
            return stale.rates.clone();
        }

        tracing::warn!(base, "all rate providers failed; using static fallback rates");
        fallback_rates(base)
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
