// lib.rs — Sauflix core.
//
// Everything that holds state or makes a decision lives here, free of any UI
// toolkit, so it can be tested without a web view. The desktop binary
// (`main.rs`, `desktop` feature) only forwards page events to `app::App`
// and hands the resulting snapshots back.
//
// RUST NOTE: `pub mod` both declares the module (src/<name>.rs) and makes it
// visible to the binary and to the integration tests in tests/.

pub mod app;
pub mod catalog;
pub mod config;
pub mod db;
pub mod debounce;
pub mod error;
pub mod feedback;
pub mod images;
pub mod models;
pub mod persistence;
pub mod query;
pub mod router;

pub use app::{App, Render, Screen};
pub use config::Config;
pub use error::{AppError, DataLoadError, StorageError};
pub use models::{MovieId, MovieRecord, QueryState, SortKey};
pub use router::ViewState;
