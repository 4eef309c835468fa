// Runtime configuration. Everything comes from environment variables
// (optionally via a `.env` file) with defaults matching the usual
// project layout: `data/` for the catalog, `_static/` for the website.

use crate::storage::Backend;
use std::path::PathBuf;

pub const DEFAULT_MOVIES_FILE: &str = "data/movies.json";
pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com/";
pub const DEFAULT_TEMPLATE: &str = "_static/index_template.html";
pub const DEFAULT_WEBSITE: &str = "_static/index.html";

#[derive(Debug, Clone)]
pub struct Config {
    pub movies_file: PathBuf,
    pub backend: Backend,
    pub omdb_url: String,
    pub api_key: Option<String>,
    pub template_path: PathBuf,
    pub website_path: PathBuf,
}

impl Config {
    /// Build the configuration from the process environment. A `.env`
    /// file in the working directory is loaded first if present, and
    /// `file_override` (the first CLI argument) wins over `MOVIES_FILE`.
    pub fn from_env(file_override: Option<String>) -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("no .env file loaded: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok(), file_override)
    }

    fn from_lookup<F>(var: F, file_override: Option<String>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let movies_file = PathBuf::from(
            file_override
                .or_else(|| var("MOVIES_FILE"))
                .unwrap_or_else(|| DEFAULT_MOVIES_FILE.into()),
        );
        let backend = match var("MOVIES_BACKEND").as_deref().map(Backend::parse) {
            Some(Some(backend)) => backend,
            Some(None) => {
                log::warn!("unknown MOVIES_BACKEND, falling back to file extension");
                Backend::from_path(&movies_file)
            }
            None => Backend::from_path(&movies_file),
        };
        let api_key = var("OMDB_API_KEY")
            .or_else(|| var("apikey"))
            .filter(|k| !k.trim().is_empty());

        Config {
            movies_file,
            backend,
            omdb_url: var("OMDB_URL").unwrap_or_else(|| DEFAULT_OMDB_URL.into()),
            api_key,
            template_path: var("MOVIES_TEMPLATE")
                .unwrap_or_else(|| DEFAULT_TEMPLATE.into())
                .into(),
            website_path: var("MOVIES_WEBSITE")
                .unwrap_or_else(|| DEFAULT_WEBSITE.into())
                .into(),
        }
    }
}
