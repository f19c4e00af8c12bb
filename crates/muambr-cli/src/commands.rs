//! Command handlers for the CLI.
//!
//! Each handler wires the pieces it needs from [`AppConfig`] and prints its
//! result to stdout; diagnostics go to stderr through `tracing`.

use anyhow::Context;
use muambr_compare::{CollectRequest, ComparisonService};
use muambr_core::{is_currency_code, AppConfig, Country, ValidationError};
use muambr_rates::ExchangeRateService;

/// Normalise a currency argument to an upper-case ISO 4217 code.
pub(crate) fn normalize_currency(raw: &str) -> Result<String, ValidationError> {
    let code = raw.trim().to_ascii_uppercase();
    if is_currency_code(&code) {
        Ok(code)
    } else {
        Err(ValidationError::InvalidCurrency {
            code: raw.to_string(),
        })
    }
}

pub(crate) fn build_request(
    term: String,
    base: Country,
    current: Option<Country>,
    currency: Option<String>,
    macro_region: bool,
) -> Result<CollectRequest, ValidationError> {
    if term.trim().is_empty() {
        return Err(ValidationError::MissingSearchTerm);
    }
    let target_currency = match currency {
        Some(raw) => normalize_currency(&raw)?,
        None => base.currency_code().to_string(),
    };

    Ok(CollectRequest {
        term: term.trim().to_string(),
        base_country: base,
        current_country: current,
        target_currency: Some(target_currency),
        use_macro_region: macro_region,
    })
}

pub(crate) async fn run_search(
    config: &AppConfig,
    request: &CollectRequest,
    limit: usize,
) -> anyhow::Result<()> {
    let service = ComparisonService::from_config(config)
        .context("failed to build comparison pipeline")?;
    let sections = service.search(request, limit).await;

    if sections.is_empty() {
        tracing::info!(term = %request.term, "no comparisons found");
    }
    println!("{}", serde_json::to_string_pretty(&sections)?);
    Ok(())
}

pub(crate) async fn run_rates(config: &AppConfig, base: &str) -> anyhow::Result<()> {
    let base = normalize_currency(base)?;
    let rates = ExchangeRateService::from_config(config)
        .context("failed to build exchange rate providers")?
        .rates(&base)
        .await;

    println!("{}", serde_json::to_string_pretty(&rates)?);
    Ok(())
}

pub(crate) async fn run_convert(
    config: &AppConfig,
    price: &str,
    from: &str,
    to: &str,
) -> anyhow::Result<()> {
    let from = normalize_currency(from)?;
    let to = normalize_currency(to)?;
    let converted = ExchangeRateService::from_config(config)
        .context("failed to build exchange rate providers")?
        .convert_price_string(price, &from, &to)
        .await?;

    println!("{converted} {to}");
    Ok(())
}
