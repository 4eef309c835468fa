use super::{ensure_parent_dir, read_file, MovieStorage};
use crate::error::StorageError;
use crate::movie::Catalog;
use std::fs;
use std::path::{Path, PathBuf};

/// Catalog stored as a JSON object `title -> {year, rating, poster}`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStorage { path: path.into() }
    }
}

impl MovieStorage for JsonStorage {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Catalog, StorageError> {
        let text = read_file(&self.path)?;
        // an empty file is an empty catalog
        if text.trim().is_empty() {
            return Ok(Catalog::new());
        }
        let movies: Catalog = serde_json::from_str(&text).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("loaded {} movies from {}", movies.len(), self.path.display());
        Ok(movies)
    }

    fn save(&self, movies: &Catalog) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(movies).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;
        ensure_parent_dir(&self.path)?;
        fs::write(&self.path, text).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("saved {} movies to {}", movies.len(), self.path.display());
        Ok(())
    }
}
