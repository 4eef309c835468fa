use super::{ensure_parent_dir, read_file, MovieStorage};
use crate::error::StorageError;
use crate::movie::{no_poster, Catalog, Movie};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Catalog stored as CSV with the header `title,year,rating,poster`.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

#[derive(Serialize, Deserialize, Debug)]
struct CsvRow {
    title: String,
    year: i32,
    rating: f64,
    #[serde(default)]
    poster: Option<String>,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStorage { path: path.into() }
    }

    fn csv_error(&self, source: csv::Error) -> StorageError {
        StorageError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

impl MovieStorage for CsvStorage {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Catalog, StorageError> {
        let text = read_file(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut movies = Catalog::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|e| self.csv_error(e))?;
            let poster = row
                .poster
                .filter(|p| !p.is_empty())
                .unwrap_or_else(no_poster);
            movies.insert(row.title, Movie::new(row.year, row.rating, poster));
        }
        log::debug!("loaded {} movies from {}", movies.len(), self.path.display());
        Ok(movies)
    }

    fn save(&self, movies: &Catalog) -> Result<(), StorageError> {
        ensure_parent_dir(&self.path)?;
        let mut writer = csv::Writer::from_path(&self.path).map_err(|e| self.csv_error(e))?;
        if movies.is_empty() {
            // serialize() only emits the header alongside the first row
            writer
                .write_record(["title", "year", "rating", "poster"])
                .map_err(|e| self.csv_error(e))?;
        }
        for (title, movie) in movies {
            writer
                .serialize(CsvRow {
                    title: title.clone(),
                    year: movie.year,
                    rating: movie.rating,
                    poster: Some(movie.poster.clone()),
                })
                .map_err(|e| self.csv_error(e))?;
        }
        writer.flush().map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("saved {} movies to {}", movies.len(), self.path.display());
        Ok(())
    }
}
