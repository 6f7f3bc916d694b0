//! Country and state/province lookups for the form's selectors

mod reference;
mod static_table;
mod traits;

pub use reference::ReferenceRegions;
pub use static_table::StaticRegions;
pub use traits::{Country, Region, RegionLookup};

#[cfg(test)]
pub use traits::MockRegionLookup;
