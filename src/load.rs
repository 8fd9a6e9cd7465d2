//! Readers for the four input files.
//!
//! The reference tables are comma-delimited, the referendum export is
//! semicolon-delimited, the geometry is GeoJSON. All three CSV loaders read
//! the whole file into typed rows; there is no streaming downstream, so
//! there is none here either.

use std::fs::File;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::AtlasError;
use crate::geo::{FeatureCollection, RegionShape};
use crate::records::{Department, ReferendumRow, Region};

fn load_csv<T: DeserializeOwned>(path: &Path, delimiter: u8) -> Result<Vec<T>, AtlasError> {
    let file = File::open(path).map_err(|source| AtlasError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|source| AtlasError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn load_regions(path: &Path) -> Result<Vec<Region>, AtlasError> {
    let rows = load_csv(path, b',')?;
    info!(rows = rows.len(), path = %path.display(), "loaded regions");
    Ok(rows)
}

pub fn load_departments(path: &Path) -> Result<Vec<Department>, AtlasError> {
    let rows = load_csv(path, b',')?;
    info!(rows = rows.len(), path = %path.display(), "loaded departments");
    Ok(rows)
}

pub fn load_referendum(path: &Path) -> Result<Vec<ReferendumRow>, AtlasError> {
    let rows = load_csv(path, b';')?;
    info!(rows = rows.len(), path = %path.display(), "loaded referendum");
    Ok(rows)
}

/// Reads `regions.geojson` into one [`RegionShape`] per feature.
pub fn load_region_shapes(path: &Path) -> Result<Vec<RegionShape>, AtlasError> {
    let file = File::open(path).map_err(|source| AtlasError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let collection: FeatureCollection =
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| {
            AtlasError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;
    if collection.kind != "FeatureCollection" {
        return Err(AtlasError::Geometry {
            path: path.to_path_buf(),
            message: format!("expected a FeatureCollection, got {:?}", collection.kind),
        });
    }

    let shapes: Vec<RegionShape> = collection
        .features
        .into_iter()
        .map(|feature| feature.into_shape())
        .collect();
    info!(shapes = shapes.len(), path = %path.display(), "loaded region geometry");
    Ok(shapes)
}
