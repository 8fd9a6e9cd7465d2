use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop the pipeline.
///
/// The only interesting class is `Unmatched`: a join key that exists on one
/// side of a merge and not the other. In lenient mode those rows are dropped
/// with a warning; in strict mode they become this error.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to open {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad record in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse {path} as GeoJSON")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid geometry in {path}: {message}")]
    Geometry { path: PathBuf, message: String },

    #[error("{count} {what}")]
    Unmatched { count: usize, what: &'static str },
}
