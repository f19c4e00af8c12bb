use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use muambr_core::{is_currency_code, ValidationError};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState, ResponseMeta};

const COMMON_CURRENCIES: [&str; 5] = ["USD", "EUR", "BRL", "GBP", "JPY"];

#[derive(Debug, Serialize)]
pub(super) struct CacheStatusResponse {
    cache_status: BTreeMap<String, DateTime<Utc>>,
    cache_count: usize,
    meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub(super) struct MessageResponse {
    message: &'static str,
    meta: ResponseMeta,
}

#[derive(Debug, Deserialize)]
pub(super) struct TestRatesQuery {
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct TestRatesResponse {
    base_currency: String,
    rates: BTreeMap<String, f64>,
    total_rates: usize,
    meta: ResponseMeta,
}

pub(super) async fn cache_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<CacheStatusResponse> {
    let cache_status = state.service.exchange_rates().cache_status();
    Json(CacheStatusResponse {
        cache_count: cache_status.len(),
        cache_status,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn clear_cache(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<MessageResponse> {
    state.service.exchange_rates().clear_cache();
    Json(MessageResponse {
        message: "Exchange rate cache cleared",
        meta: ResponseMeta::new(req_id.0),
    })
}

/// Resolve rates for a base currency and show the common ones.
pub(super) async fn test_rates(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TestRatesQuery>,
) -> Result<Json<TestRatesResponse>, ApiError> {
    let base = query
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map_or_else(|| "USD".to_string(), str::to_ascii_uppercase);
    if !is_currency_code(&base) {
        return Err(ApiError::validation(
            req_id.0,
            &ValidationError::InvalidCurrency { code: base },
        ));
    }

    let rates = state.service.exchange_rates().rates(&base).await;
    let selected = COMMON_CURRENCIES
        .iter()
        .filter_map(|code| rates.get(*code).map(|rate| ((*code).to_string(), *rate)))
        .collect();

    Ok(Json(TestRatesResponse {
        base_currency: base,
        rates: selected,
        total_rates: rates.len(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
