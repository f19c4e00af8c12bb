use super::*;

fn storefront(id: &str, country: Country) -> StorefrontConfig {
    StorefrontConfig {
        id: id.to_string(),
        name: "Loja Exemplo".to_string(),
        country,
        base_url: "https://loja.example.com".to_string(),
        currency: None,
    }
}

#[test]
fn currency_defaults_to_country_currency() {
    let store = storefront("loja-br", Country::Brazil);
    assert_eq!(store.currency_code(), "BRL");

    let overridden = StorefrontConfig {
        currency: Some("USD".to_string()),
        ..storefront("loja-br", Country::Brazil)
    };
    assert_eq!(overridden.currency_code(), "USD");
}

#[test]
fn validate_accepts_distinct_storefronts() {
    let file = StorefrontsFile {
        storefronts: vec![
            storefront("loja-br", Country::Brazil),
            storefront("loja-pt", Country::Portugal),
        ],
    };
    assert!(validate_storefronts(&file).is_ok());
}

#[test]
fn validate_rejects_empty_id() {
    let file = StorefrontsFile {
        storefronts: vec![storefront("  ", Country::Brazil)],
    };
    let err = validate_storefronts(&file).unwrap_err();
    assert!(err.to_string().contains("id must be non-empty"));
}

#[test]
fn validate_rejects_duplicate_ids_case_insensitively() {
    let file = StorefrontsFile {
        storefronts: vec![
            storefront("Loja-BR", Country::Brazil),
            storefront("loja-br", Country::Portugal),
        ],
    };
    let err = validate_storefronts(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate storefront id"));
}

#[test]
fn validate_rejects_non_http_base_url() {
    let file = StorefrontsFile {
        storefronts: vec![StorefrontConfig {
            base_url: "ftp://loja.example.com".to_string(),
            ..storefront("loja-br", Country::Brazil)
        }],
    };
    let err = validate_storefronts(&file).unwrap_err();
    assert!(err.to_string().contains("invalid base_url"));
}

#[test]
fn validate_rejects_bad_currency() {
    let file = StorefrontsFile {
        storefronts: vec![StorefrontConfig {
            currency: Some("euro".to_string()),
            ..storefront("loja-pt", Country::Portugal)
        }],
    };
    let err = validate_storefronts(&file).unwrap_err();
    assert!(err.to_string().contains("invalid currency"));
}

#[test]
fn parses_yaml_with_iso_country_codes() {
    let yaml = r"
storefronts:
  - id: loja-br
    name: Loja Exemplo
    country: BR
    base_url: https://loja.example.com.br
  - id: tienda-es
    name: Tienda
    country: ES
    base_url: https://tienda.example.es
    currency: EUR
";
    let file: StorefrontsFile = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(file.storefronts.len(), 2);
    assert_eq!(file.storefronts[0].country, Country::Brazil);
    assert_eq!(file.storefronts[1].currency.as_deref(), Some("EUR"));
    assert!(validate_storefronts(&file).is_ok());
}

#[test]
fn unknown_country_fails_to_parse() {
    let yaml = r"
storefronts:
  - id: x
    name: X
    country: XX
    base_url: https://x.example.com
";
    assert!(serde_yaml::from_str::<StorefrontsFile>(yaml).is_err());
}

#[test]
fn load_storefronts_reports_missing_file() {
    let err = load_storefronts(Path::new("/nonexistent/storefronts.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::StorefrontsFileIo { .. }));
}
