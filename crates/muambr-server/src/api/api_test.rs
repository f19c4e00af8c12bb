use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use muambr_compare::{ComparisonProcessor, ExtractionOrchestrator};
use muambr_core::{Country, ProductListing, ValidationError};
use muambr_rates::ExchangeRateService;
use muambr_scraper::{Extractor, ExtractorRegistry, ScraperError};
use tower::ServiceExt;

use super::comparisons::{parse_query, ComparisonQuery};
use super::*;

struct FixedExtractor {
    id: &'static str,
    country: Country,
    prices: Vec<f64>,
}

#[async_trait]
impl Extractor for FixedExtractor {
    fn country(&self) -> Country {
        self.country
    }

    fn identifier(&self) -> &str {
        self.id
    }

    fn base_url(&self) -> &str {
        "https://fixed.example.com"
    }

    async fn fetch(&self, term: &str) -> Result<Vec<ProductListing>, ScraperError> {
        Ok(self
            .prices
            .iter()
            .map(|price| ProductListing {
                product_name: term.to_string(),
                price: *price,
                currency: self.country.currency_code().to_string(),
                store_name: self.id.to_string(),
                country: self.country.iso_code().to_string(),
                url: None,
                converted_price: None,
            })
            .collect())
    }
}

/// Brazil and Portugal stores; no rate providers, so conversions use the
/// static fallback table (EUR -> BRL 6.27).
fn test_app() -> (Router, ExchangeRateService) {
    let mut registry = ExtractorRegistry::new();
    registry.register(Arc::new(FixedExtractor {
        id: "kabum",
        country: Country::Brazil,
        prices: vec![5200.0, 4999.0, 5100.0],
    }));
    registry.register(Arc::new(FixedExtractor {
        id: "worten",
        country: Country::Portugal,
        prices: vec![900.0],
    }));
    let rates = ExchangeRateService::new(Vec::new());
    let orchestrator = ExtractionOrchestrator::new(Arc::new(registry), rates.clone());
    let service = ComparisonService::new(orchestrator, ComparisonProcessor::new());
    (build_app(AppState { service }), rates)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_json(app, Request::builder().uri(uri).body(Body::empty()).expect("request")).await
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json parse");
    (status, json)
}

fn query(pairs: &[(&str, &str)]) -> ComparisonQuery {
    let mut q = ComparisonQuery::default();
    for (key, value) in pairs {
        let value = Some((*value).to_string());
        match *key {
            "name" => q.name = value,
            "baseCountry" => q.base_country = value,
            "currentUserCountry" => q.current_user_country = value,
            "currency" => q.currency = value,
            "limit" => q.limit = value,
            "useMacroRegion" => q.use_macro_region = value,
            other => panic!("unknown query key {other}"),
        }
    }
    q
}

#[test]
fn parse_query_applies_defaults() {
    let (request, limit) =
        parse_query(&query(&[("name", "iphone"), ("baseCountry", "br")])).unwrap();
    assert_eq!(request.term, "iphone");
    assert_eq!(request.base_country, Country::Brazil);
    assert_eq!(request.current_country, None);
    assert_eq!(request.target_currency.as_deref(), Some("BRL"));
    assert!(!request.use_macro_region);
    assert_eq!(limit, 10);
}

#[test]
fn parse_query_requires_name_and_base_country() {
    assert_eq!(
        parse_query(&query(&[("baseCountry", "PT")])).unwrap_err(),
        ValidationError::MissingSearchTerm
    );
    assert_eq!(
        parse_query(&query(&[("name", "iphone"), ("baseCountry", "  ")])).unwrap_err(),
        ValidationError::MissingBaseCountry
    );
}

#[test]
fn parse_query_rejects_unknown_countries_and_currencies() {
    assert!(matches!(
        parse_query(&query(&[("name", "x"), ("baseCountry", "FR")])),
        Err(ValidationError::InvalidCountry { .. })
    ));
    assert!(matches!(
        parse_query(&query(&[
            ("name", "x"),
            ("baseCountry", "PT"),
            ("currentUserCountry", "XX")
        ])),
        Err(ValidationError::InvalidCountry { .. })
    ));
    assert!(matches!(
        parse_query(&query(&[("name", "x"), ("baseCountry", "PT"), ("currency", "euro")])),
        Err(ValidationError::InvalidCurrency { .. })
    ));
}

#[test]
fn parse_query_limit_falls_back_to_default() {
    for raw in ["0", "-3", "ten", ""] {
        let (_, limit) =
            parse_query(&query(&[("name", "x"), ("baseCountry", "PT"), ("limit", raw)])).unwrap();
        assert_eq!(limit, 10, "limit {raw:?}");
    }
    let (_, limit) =
        parse_query(&query(&[("name", "x"), ("baseCountry", "PT"), ("limit", "3")])).unwrap();
    assert_eq!(limit, 3);
}

#[test]
fn parse_query_macro_region_only_for_true() {
    for (raw, expected) in [("true", true), ("TRUE", true), ("1", false), ("yes", false)] {
        let (request, _) = parse_query(&query(&[
            ("name", "x"),
            ("baseCountry", "PT"),
            ("useMacroRegion", raw),
        ]))
        .unwrap();
        assert_eq!(request.use_macro_region, expected, "useMacroRegion {raw:?}");
    }
}

#[test]
fn parse_query_uppercases_currency() {
    let (request, _) =
        parse_query(&query(&[("name", "x"), ("baseCountry", "PT"), ("currency", "usd")])).unwrap();
    assert_eq!(request.target_currency.as_deref(), Some("USD"));
}

#[tokio::test]
async fn health_returns_ok_with_request_id() {
    let (app, _) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn supplied_request_id_is_echoed() {
    let (app, _) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "req-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "req-123"
    );
}

#[tokio::test]
async fn comparisons_returns_sections_per_country() {
    let (app, _) = test_app();
    let (status, json) = get_json(
        app,
        "/api/comparisons?name=iphone&baseCountry=BR&currentUserCountry=PT&limit=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["total_results"], 3);

    let sections = json["sections"].as_array().expect("sections array");
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["country"], "BR");
    assert_eq!(sections[0]["country_name"], "Brazil");
    assert_eq!(sections[0]["results_count"], 2);
    assert_eq!(sections[0]["comparisons"][0]["price"], 4999.0);
    assert_eq!(
        sections[0]["comparisons"][0]["store_name"],
        "kabum (Available for Brazil) - Browsing from Portugal"
    );

    assert_eq!(sections[1]["country"], "PT");
    let worten = &sections[1]["comparisons"][0];
    assert_eq!(worten["currency"], "EUR");
    assert_eq!(worten["converted_price"]["currency"], "BRL");
    assert_eq!(worten["converted_price"]["amount"], 5643.0);
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn comparisons_without_matches_is_successful_and_empty() {
    let (app, _) = test_app();
    let (status, json) = get_json(app, "/api/comparisons?name=kindle&baseCountry=DE").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "No comparisons found for this product");
    assert_eq!(json["total_results"], 0);
    assert_eq!(json["sections"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn comparisons_missing_name_is_bad_request() {
    let (app, _) = test_app();
    let (status, json) = get_json(app, "/api/comparisons?baseCountry=BR").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn comparisons_invalid_country_is_bad_request() {
    let (app, _) = test_app();
    let (status, json) = get_json(app, "/api/comparisons?name=iphone&baseCountry=FR").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.contains("PT, US, ES, DE, GB, BR"), "{message}");
}

#[tokio::test]
async fn exchange_rate_admin_endpoints() {
    let (app, rates) = test_app();

    let (status, json) = get_json(app.clone(), "/admin/exchange-rates/test?currency=eur").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["base_currency"], "EUR");
    assert_eq!(json["rates"]["BRL"], 6.27);
    assert_eq!(json["total_rates"], 5);

    let (status, json) = get_json(app.clone(), "/admin/exchange-rates/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cache_count"], 0, "fallback rates are never cached");

    let (status, json) = send_json(
        app,
        Request::builder()
            .method("DELETE")
            .uri("/admin/exchange-rates/cache")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Exchange rate cache cleared");
    assert!(rates.cache_status().is_empty());
}

#[tokio::test]
async fn exchange_rate_test_defaults_to_usd_and_validates() {
    let (app, _) = test_app();

    let (status, json) = get_json(app.clone(), "/admin/exchange-rates/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["base_currency"], "USD");

    let (status, _) = get_json(app, "/admin/exchange-rates/test?currency=dollars").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
