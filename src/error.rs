// error.rs — Error types shared across the crate.
//
// RUST NOTE: `thiserror` derives `std::error::Error` and `Display` from the
// `#[error(...)]` attributes, and `#[from]` generates the `From` impls that
// make the `?` operator convert one error type into another.

use thiserror::Error;

use crate::models::MovieId;

/// The catalog could not be fetched or does not have the expected shape.
/// Fatal to startup: no partial catalog is ever shown.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("could not read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not fetch catalog: {0}")]
    Transport(String),

    #[error("catalog request to {url} failed with HTTP {code}")]
    Status { code: u16, url: String },

    #[error("catalog is not valid JSON of the expected shape: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog contains movie id {0} more than once")]
    DuplicateId(MovieId),

    #[error("catalog contains a movie with id 0 ({title:?})")]
    InvalidId { title: String },
}

/// Failures of the durable key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not encode stored value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not create storage directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage lock poisoned: {0}")]
    LockPoisoned(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything that can stop the application from starting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
