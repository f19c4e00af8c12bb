//! Static country and macro-region tables.
//!
//! Every [`Country`] belongs to exactly one [`MacroRegion`]. Both tables are
//! fixed at compile time; nothing here is mutated at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Broad grouping of countries used to widen extractor selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MacroRegion {
    Eu,
    Na,
    Latam,
}

impl MacroRegion {
    pub const ALL: [MacroRegion; 3] = [MacroRegion::Eu, MacroRegion::Na, MacroRegion::Latam];

    /// Countries that belong to this region, in table order.
    #[must_use]
    pub fn countries(self) -> Vec<Country> {
        Country::ALL
            .iter()
            .copied()
            .filter(|c| c.macro_region() == self)
            .collect()
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            MacroRegion::Eu => "EU",
            MacroRegion::Na => "NA",
            MacroRegion::Latam => "LATAM",
        }
    }
}

impl fmt::Display for MacroRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A supported country, identified by its ISO 3166-1 alpha-2 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "BR")]
    Brazil,
    #[serde(rename = "US")]
    UnitedStates,
    #[serde(rename = "PT")]
    Portugal,
    #[serde(rename = "ES")]
    Spain,
    #[serde(rename = "GB")]
    UnitedKingdom,
    #[serde(rename = "DE")]
    Germany,
}

impl Country {
    pub const ALL: [Country; 6] = [
        Country::Portugal,
        Country::UnitedStates,
        Country::Spain,
        Country::Germany,
        Country::UnitedKingdom,
        Country::Brazil,
    ];

    #[must_use]
    pub fn iso_code(self) -> &'static str {
        match self {
            Country::Brazil => "BR",
            Country::UnitedStates => "US",
            Country::Portugal => "PT",
            Country::Spain => "ES",
            Country::UnitedKingdom => "GB",
            Country::Germany => "DE",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Country::Brazil => "Brazil",
            Country::UnitedStates => "United States",
            Country::Portugal => "Portugal",
            Country::Spain => "Spain",
            Country::UnitedKingdom => "United Kingdom",
            Country::Germany => "Germany",
        }
    }

    /// ISO 4217 code of the currency prices are listed in.
    #[must_use]
    pub fn currency_code(self) -> &'static str {
        match self {
            Country::Brazil => "BRL",
            Country::UnitedStates => "USD",
            Country::Portugal | Country::Spain | Country::Germany => "EUR",
            Country::UnitedKingdom => "GBP",
        }
    }

    /// ISO 639-1 code of the country's primary language.
    #[must_use]
    pub fn language_code(self) -> &'static str {
        match self {
            Country::Brazil | Country::Portugal => "pt",
            Country::UnitedStates | Country::UnitedKingdom => "en",
            Country::Spain => "es",
            Country::Germany => "de",
        }
    }

    #[must_use]
    pub fn macro_region(self) -> MacroRegion {
        match self {
            Country::Brazil => MacroRegion::Latam,
            Country::UnitedStates => MacroRegion::Na,
            Country::Portugal | Country::Spain | Country::UnitedKingdom | Country::Germany => {
                MacroRegion::Eu
            }
        }
    }

    /// Looks up a country by ISO code, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCountry`] for unsupported codes.
    pub fn from_iso(code: &str) -> Result<Self, ValidationError> {
        let normalized = code.trim().to_ascii_uppercase();
        Country::ALL
            .iter()
            .copied()
            .find(|c| c.iso_code() == normalized)
            .ok_or_else(|| ValidationError::InvalidCountry {
                code: code.to_string(),
            })
    }

    /// Display name for an ISO code, falling back to the code itself.
    #[must_use]
    pub fn display_name_for(code: &str) -> String {
        Country::from_iso(code).map_or_else(|_| code.to_string(), |c| c.name().to_string())
    }
}

impl FromStr for Country {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::from_iso(s)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iso_code())
    }
}
