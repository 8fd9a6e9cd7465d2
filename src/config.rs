//! Pipeline configuration, a small TOML file.
//!
//! Every key has a default pointing at `data/`, so a missing or empty file
//! is a valid configuration.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AtlasConfig {
    /// Semicolon-delimited per-town referendum export.
    pub referendum: String,
    /// Comma-delimited region reference table.
    pub regions: String,
    /// Comma-delimited department reference table.
    pub departments: String,
    /// GeoJSON FeatureCollection of region outlines.
    pub geometry: String,
    /// Where the choropleth SVG goes.
    pub map_output: String,
    /// Where the annotated per-region table goes.
    pub table_output: String,
    /// Fail on unmatched join keys instead of dropping with a warning.
    pub strict: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        AtlasConfig {
            referendum: "data/referendum.csv".to_string(),
            regions: "data/regions.csv".to_string(),
            departments: "data/departments.csv".to_string(),
            geometry: "data/regions.geojson".to_string(),
            map_output: "referendum_map.svg".to_string(),
            table_output: "referendum_results.csv".to_string(),
            strict: false,
        }
    }
}

pub fn load_config(path: &str) -> anyhow::Result<AtlasConfig> {
    let cfg = ::config::Config::builder()
        .add_source(::config::File::with_name(path).required(false))
        .build()?;
    Ok(cfg.try_deserialize()?)
}
