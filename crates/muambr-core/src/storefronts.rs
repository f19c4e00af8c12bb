use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{is_currency_code, ConfigError, Country};

/// One storefront searched through its public JSON search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Stable identifier, also used as the extractor identifier.
    pub id: String,
    /// Store name shown next to each listing.
    pub name: String,
    pub country: Country,
    pub base_url: String,
    /// Listing currency. Defaults to the country's currency.
    pub currency: Option<String>,
}

impl StorefrontConfig {
    #[must_use]
    pub fn currency_code(&self) -> &str {
        self.currency
            .as_deref()
            .unwrap_or_else(|| self.country.currency_code())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StorefrontsFile {
    #[serde(default)]
    pub storefronts: Vec<StorefrontConfig>,
}

/// Load and validate the storefront list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_storefronts(path: &Path) -> Result<StorefrontsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StorefrontsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: StorefrontsFile = serde_yaml::from_str(&content)?;

    validate_storefronts(&file)?;

    Ok(file)
}

fn validate_storefronts(file: &StorefrontsFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for storefront in &file.storefronts {
        if storefront.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storefront id must be non-empty".to_string(),
            ));
        }

        if storefront.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "storefront '{}' must have a non-empty name",
                storefront.id
            )));
        }

        if !(storefront.base_url.starts_with("https://")
            || storefront.base_url.starts_with("http://"))
        {
            return Err(ConfigError::Validation(format!(
                "storefront '{}' has invalid base_url '{}'; expected http(s)://",
                storefront.id, storefront.base_url
            )));
        }

        if let Some(currency) = &storefront.currency {
            if !is_currency_code(currency) {
                return Err(ConfigError::Validation(format!(
                    "storefront '{}' has invalid currency '{currency}'",
                    storefront.id
                )));
            }
        }

        if !seen_ids.insert(storefront.id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate storefront id: '{}'",
                storefront.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "storefronts_test.rs"]
mod tests;
