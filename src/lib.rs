//! Batch pipeline for French referendum results: load three reference
//! tables, join them, aggregate per region, and render a choropleth of the
//! Choice A share of expressed ballots.

pub mod aggregate;
pub mod codes;
pub mod config;
pub mod error;
pub mod geo;
pub mod load;
pub mod merge;
pub mod records;
pub mod render;
