use axum::{
    extract::{Query, State},
    Extension, Json,
};
use muambr_compare::CollectRequest;
use muambr_core::{is_currency_code, Country, CountrySection, ValidationError};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState, ResponseMeta};

const DEFAULT_LIMIT: usize = 10;
const NO_RESULTS_MESSAGE: &str = "No comparisons found for this product";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ComparisonQuery {
    pub name: Option<String>,
    pub base_country: Option<String>,
    pub current_user_country: Option<String>,
    pub currency: Option<String>,
    /// Kept as text so junk falls back to the default instead of a 400.
    pub limit: Option<String>,
    pub use_macro_region: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ComparisonResponse {
    success: bool,
    message: String,
    sections: Vec<CountrySection>,
    total_results: usize,
    meta: ResponseMeta,
}

pub(super) async fn search_comparisons(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ComparisonQuery>,
) -> Result<Json<ComparisonResponse>, ApiError> {
    let (request, limit) =
        parse_query(&query).map_err(|e| ApiError::validation(req_id.0.clone(), &e))?;

    let sections = state.service.search(&request, limit).await;
    let total_results: usize = sections.iter().map(|s| s.results_count).sum();

    let message = if total_results == 0 {
        NO_RESULTS_MESSAGE.to_string()
    } else {
        format!(
            "Found {total_results} comparisons across {} countries",
            sections.len()
        )
    };

    Ok(Json(ComparisonResponse {
        success: true,
        message,
        sections,
        total_results,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Validate query parameters into a pipeline request and a per-country limit.
pub(super) fn parse_query(
    query: &ComparisonQuery,
) -> Result<(CollectRequest, usize), ValidationError> {
    let term = non_blank(query.name.as_ref()).ok_or(ValidationError::MissingSearchTerm)?;
    let base_country = non_blank(query.base_country.as_ref())
        .ok_or(ValidationError::MissingBaseCountry)
        .and_then(Country::from_iso)?;
    let current_country = non_blank(query.current_user_country.as_ref())
        .map(Country::from_iso)
        .transpose()?;

    let currency = match non_blank(query.currency.as_ref()) {
        Some(raw) => {
            let code = raw.to_ascii_uppercase();
            if !is_currency_code(&code) {
                return Err(ValidationError::InvalidCurrency {
                    code: raw.to_string(),
                });
            }
            code
        }
        None => base_country.currency_code().to_string(),
    };

    let limit = non_blank(query.limit.as_ref())
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|limit| *limit > 0)
        .and_then(|limit| usize::try_from(limit).ok())
        .unwrap_or(DEFAULT_LIMIT);

    let use_macro_region = non_blank(query.use_macro_region.as_ref())
        .is_some_and(|raw| raw.eq_ignore_ascii_case("true"));

    Ok((
        CollectRequest {
            term: term.to_string(),
            base_country,
            current_country,
            target_currency: Some(currency),
            use_macro_region,
        },
        limit,
    ))
}
