// config.rs — Optional TOML configuration.
//
// Every section and key has a default, so an absent file or an empty one
// both give a working setup.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::CatalogSource;
use crate::error::ConfigError;
use crate::models::DEFAULT_PAGE_SIZE;

pub const CONFIG_ENV: &str = "SAUFLIX_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "sauflix.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Local path or http(s) URL of movies.json.
    pub source: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { source: "ui/data/movies.json".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub path:      Option<PathBuf>,
    pub in_memory: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueryConfig {
    pub page_size:         usize,
    pub page_size_options: Vec<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_size:         DEFAULT_PAGE_SIZE,
            page_size_options: vec![12, 24, 48],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
    pub query:   QueryConfig,
    pub search:  SearchConfig,
    pub log:     LogConfig,
}

impl Config {
    /// Relative file paths inside the config are also looked up next to the
    /// config file itself.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut parsed: Self = toml::from_str(&contents)?;

        if let CatalogSource::File(source) = CatalogSource::parse(&parsed.catalog.source) {
            let config_dir = path.parent().map(Path::to_path_buf);
            parsed.catalog.source = resolve_relative(source, config_dir).display().to_string();
        }
        Ok(parsed.sanitized())
    }

    /// `$SAUFLIX_CONFIG` if set, else `./sauflix.toml` if present, else defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load(local);
        }
        Ok(Self::default())
    }

    /// Replace values that would break the pipeline with their defaults.
    fn sanitized(mut self) -> Self {
        if self.query.page_size == 0 {
            log::warn!("query.page_size must be positive, using {DEFAULT_PAGE_SIZE}");
            self.query.page_size = DEFAULT_PAGE_SIZE;
        }
        self.query.page_size_options.retain(|&size| size > 0);
        if !self.query.page_size_options.contains(&self.query.page_size) {
            self.query.page_size_options.push(self.query.page_size);
            self.query.page_size_options.sort_unstable();
        }
        self
    }

    /// A relative catalog path that doesn't exist under the working directory
    /// is tried next to the executable and then in its parent directories, so
    /// the binary can be launched from anywhere.
    pub fn catalog_source(&self) -> CatalogSource {
        match CatalogSource::parse(&self.catalog.source) {
            CatalogSource::File(path) => CatalogSource::File(resolve_relative(path, exe_dirs())),
            remote => remote,
        }
    }

    pub fn storage_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(crate::db::get_db_path)
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }
}

/// Directories holding the executable, innermost first (`target/debug`,
/// `target`, the project root, ...).
fn exe_dirs() -> Vec<PathBuf> {
    std::env::current_exe()
        .map(|exe| exe.ancestors().skip(1).map(Path::to_path_buf).collect())
        .unwrap_or_default()
}

/// `path` itself if absolute or present under the working directory, else the
/// first `bases` entry that contains it. A path found nowhere is returned
/// unchanged so the load error names what was configured.
fn resolve_relative(path: PathBuf, bases: impl IntoIterator<Item = PathBuf>) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path;
    }
    match bases.into_iter().map(|base| base.join(&path)).find(|p| p.exists()) {
        Some(found) => {
            log::debug!("resolved {} to {}", path.display(), found.display());
            found
        }
        None => path,
    }
}
