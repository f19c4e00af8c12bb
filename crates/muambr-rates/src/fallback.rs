use crate::provider::RateTable;

const FALLBACK_TABLE: &[(&str, &[(&str, f64)])] = &[
    (
        "USD",
        &[
            ("USD", 1.0),
            ("EUR", 0.85),
            ("BRL", 5.34),
            ("GBP", 0.74),
            ("JPY", 150.0),
        ],
    ),
    (
        "EUR",
        &[
            ("USD", 1.17),
            ("EUR", 1.0),
            ("BRL", 6.27),
            ("GBP", 0.87),
            ("JPY", 176.5),
        ],
    ),
    (
        "BRL",
        &[
            ("USD", 0.19),
            ("EUR", 0.16),
            ("BRL", 1.0),
            ("GBP", 0.14),
            ("JPY", 28.1),
        ],
    ),
];

const IDENTITY_CURRENCIES: [&str; 5] = ["USD", "EUR", "BRL", "GBP", "JPY"];

/// Approximate rates used when no provider answers and nothing is cached.
///
/// Bases outside the static table get 1.0 for every common currency.
#[must_use]
pub fn fallback_rates(base: &str) -> RateTable {
    FALLBACK_TABLE
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(base))
        .map_or_else(
            || {
                IDENTITY_CURRENCIES
                    .iter()
                    .map(|code| ((*code).to_string(), 1.0))
                    .collect()
            },
            |(_, rates)| {
                rates
                    .iter()
                    .map(|(code, rate)| ((*code).to_string(), *rate))
                    .collect()
            },
        )
}
