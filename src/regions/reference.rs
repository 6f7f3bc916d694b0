//! Fuller country/subdivision lookup backed by a bundled reference table

use super::traits::{Country, Region, RegionLookup};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

const BUNDLED_TABLE: &str = include_str!("../../data/regions.json");

#[derive(Debug, Deserialize)]
struct CountryRecord {
    code: String,
    name: String,
    #[serde(default)]
    regions: Vec<Region>,
}

/// Lookup over the bundled reference table
///
/// Countries without modeled subdivisions are still selectable; their
/// region list is empty.
#[derive(Debug, Clone)]
pub struct ReferenceRegions {
    countries: Vec<Country>,
    regions: HashMap<String, Vec<Region>>,
}

impl ReferenceRegions {
    /// Load the table shipped with the crate
    pub fn load() -> Result<Self> {
        Self::from_json(BUNDLED_TABLE).context("Failed to load bundled region table")
    }

    /// Parse a table of `[{code, name, regions: [{code, name}]}]`
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<CountryRecord> = serde_json::from_str(json)?;

        let mut countries = Vec::with_capacity(records.len());
        let mut regions = HashMap::with_capacity(records.len());

        for record in records {
            if regions.contains_key(&record.code) {
                bail!("Duplicate country code `{}` in region table", record.code);
            }
            let mut list = record.regions;
            list.sort_by(|a, b| a.name.cmp(&b.name));
            countries.push(Country {
                code: record.code.clone(),
                name: record.name,
            });
            regions.insert(record.code, list);
        }
        countries.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(countries = countries.len(), "Loaded region reference table");
        Ok(Self { countries, regions })
    }
}

impl RegionLookup for ReferenceRegions {
    fn regions_of(&self, country_code: &str) -> Vec<Region> {
        self.regions.get(country_code).cloned().unwrap_or_default()
    }

    fn countries(&self) -> Vec<Country> {
        self.countries.clone()
    }
}
