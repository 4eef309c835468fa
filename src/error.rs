// Error types shared by the library modules. The binary and the UI layer
// wrap these in `anyhow` when they only need to report them.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of a storage backend. `Missing`, `NotFound` and `Duplicate`
/// are expected outcomes the UI reports and recovers from; the rest are
/// I/O or format problems with the backing file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage file {} does not exist", .0.display())]
    Missing(PathBuf),

    #[error("Movie '{0}' doesn't exist!")]
    NotFound(String),

    #[error("Movie {0} already exist!")]
    Duplicate(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failures of a movie-information lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no OMDb API key configured (set OMDB_API_KEY)")]
    MissingApiKey,

    #[error("{0}")]
    NotFound(String),

    #[error("request to movie-information service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("movie-information service answered {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected movie-information response: {0}")]
    Malformed(String),
}

/// Failures while producing the histogram image or the website.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no ratings to plot")]
    NoRatings,

    #[error("cannot read template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot save histogram: {0}")]
    Image(#[from] image::ImageError),
}
