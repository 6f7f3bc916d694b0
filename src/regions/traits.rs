//! Trait abstraction for country/state lookups to enable mocking in tests

use serde::{Deserialize, Serialize};

/// A state, province or other first-level subdivision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub code: String,
    pub name: String,
}

impl Region {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// A selectable country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// Source of country and subdivision data for the form's selectors
///
/// Lookups are synchronous and total: an unknown or empty country code
/// yields an empty list.
#[cfg_attr(test, mockall::automock)]
pub trait RegionLookup: Send + Sync {
    /// Subdivisions of `country_code`, ordered by name
    fn regions_of(&self, country_code: &str) -> Vec<Region>;

    /// Selectable countries, ordered by name
    fn countries(&self) -> Vec<Country>;
}
