// File-backed catalog storage.
//
// Every operation loads the whole catalog, mutates it in memory and
// rewrites the whole file. Backends only have to provide `load` and
// `save`; the catalog operations are shared default methods.

mod csv_storage;
mod json_storage;

pub use csv_storage::CsvStorage;
pub use json_storage::JsonStorage;

use crate::error::StorageError;
use crate::movie::{Catalog, Movie};
use std::fs;
use std::path::{Path, PathBuf};

/// Concrete file format of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Json,
    Csv,
}

impl Backend {
    /// CSV for a `.csv` extension, JSON for anything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Backend::Csv,
            _ => Backend::Json,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Backend::Json),
            "csv" => Some(Backend::Csv),
            _ => None,
        }
    }
}

pub fn open_storage(path: impl Into<PathBuf>, backend: Backend) -> Box<dyn MovieStorage> {
    let path = path.into();
    log::debug!("using {:?} storage at {}", backend, path.display());
    match backend {
        Backend::Json => Box::new(JsonStorage::new(path)),
        Backend::Csv => Box::new(CsvStorage::new(path)),
    }
}

pub trait MovieStorage {
    fn path(&self) -> &Path;

    /// Read the whole catalog. A missing file is `StorageError::Missing`.
    fn load(&self) -> Result<Catalog, StorageError>;

    /// Replace the file contents with `movies`.
    fn save(&self, movies: &Catalog) -> Result<(), StorageError>;

    fn list_movies(&self) -> Result<Catalog, StorageError> {
        self.load()
    }

    fn create_empty(&self) -> Result<(), StorageError> {
        log::info!("creating empty catalog at {}", self.path().display());
        self.save(&Catalog::new())
    }

    fn contains(&self, title: &str) -> Result<bool, StorageError> {
        Ok(self.load()?.contains_key(title))
    }

    /// Insert or overwrite `title`.
    fn add_movie(&self, title: &str, movie: Movie) -> Result<(), StorageError> {
        let mut movies = self.load()?;
        movies.insert(title.to_string(), movie);
        self.save(&movies)
    }

    /// Like `add_movie` but refuses to overwrite, leaving the file untouched.
    fn add_new_movie(&self, title: &str, movie: Movie) -> Result<(), StorageError> {
        let mut movies = self.load()?;
        if movies.contains_key(title) {
            return Err(StorageError::Duplicate(title.to_string()));
        }
        movies.insert(title.to_string(), movie);
        self.save(&movies)
    }

    fn delete_movie(&self, title: &str) -> Result<Movie, StorageError> {
        let mut movies = self.load()?;
        let removed = movies
            .shift_remove(title)
            .ok_or_else(|| StorageError::NotFound(title.to_string()))?;
        self.save(&movies)?;
        Ok(removed)
    }

    /// Change the rating only; year and poster are kept.
    fn update_movie(&self, title: &str, rating: f64) -> Result<(), StorageError> {
        let mut movies = self.load()?;
        let movie = movies
            .get_mut(title)
            .ok_or_else(|| StorageError::NotFound(title.to_string()))?;
        movie.rating = rating;
        self.save(&movies)
    }
}

/// Read `path` to a string, mapping "not found" to `Missing`.
pub(crate) fn read_file(path: &Path) -> Result<String, StorageError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            StorageError::Missing(path.to_path_buf())
        } else {
            StorageError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), StorageError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
