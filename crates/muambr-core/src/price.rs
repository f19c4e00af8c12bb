//! Locale-tolerant parsing of scraped price strings.

/// Currency markers stripped before parsing. `R$` must come before `$`.
const CURRENCY_SYMBOLS: [&str; 5] = ["R$", "€", "$", "£", "¥"];

/// Parses a price such as `"R$ 1.234,56"`, `"1234,56"` or `"€12.99"`.
///
/// When both `,` and `.` appear, `.` is read as the thousands separator and
/// `,` as the decimal separator. A lone `,` is a decimal separator.
///
/// Returns `None` for empty, non-numeric, non-finite, zero or negative input.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let mut cleaned = raw.to_string();
    for symbol in CURRENCY_SYMBOLS {
        cleaned = cleaned.replace(symbol, "");
    }
    let cleaned = cleaned.trim();

    let normalized = if cleaned.contains(',') && cleaned.contains('.') {
        let parts: Vec<&str> = cleaned.split(',').collect();
        if let [integer, fraction] = parts.as_slice() {
            format!("{}.{fraction}", integer.replace('.', ""))
        } else {
            cleaned.to_string()
        }
    } else if cleaned.contains(',') {
        cleaned.replace(',', ".")
    } else {
        cleaned.to_string()
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

/// `true` for a 3-letter uppercase ASCII code such as `"EUR"`.
#[must_use]
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}
