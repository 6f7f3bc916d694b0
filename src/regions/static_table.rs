//! Small in-repo country table

use super::traits::{Country, Region, RegionLookup};

/// (country code, country name, [(state code, state name)])
type CountryRow = (&'static str, &'static str, &'static [(&'static str, &'static str)]);

const TABLE: &[CountryRow] = &[
    (
        "US",
        "United States",
        &[
            ("AL", "Alabama"),
            ("AK", "Alaska"),
            ("AZ", "Arizona"),
            ("AR", "Arkansas"),
            ("CA", "California"),
        ],
    ),
    (
        "IN",
        "India",
        &[
            ("AP", "Andhra Pradesh"),
            ("AR", "Arunachal Pradesh"),
            ("AS", "Assam"),
            ("BR", "Bihar"),
            ("CT", "Chhattisgarh"),
        ],
    ),
    (
        "AU",
        "Australia",
        &[
            ("NSW", "New South Wales"),
            ("QLD", "Queensland"),
            ("SA", "South Australia"),
            ("TAS", "Tasmania"),
            ("VIC", "Victoria"),
        ],
    ),
];

/// Lookup backed by a fixed three-country table
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRegions;

impl StaticRegions {
    pub fn new() -> Self {
        Self
    }
}

impl RegionLookup for StaticRegions {
    fn regions_of(&self, country_code: &str) -> Vec<Region> {
        let mut regions: Vec<Region> = TABLE
            .iter()
            .find(|(code, _, _)| *code == country_code)
            .map(|(_, _, states)| {
                states
                    .iter()
                    .map(|(code, name)| Region::new(code, name))
                    .collect()
            })
            .unwrap_or_default();
        regions.sort_by(|a, b| a.name.cmp(&b.name));
        regions
    }

    fn countries(&self) -> Vec<Country> {
        let mut countries: Vec<Country> = TABLE
            .iter()
            .map(|(code, name, _)| Country {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        countries
    }
}
