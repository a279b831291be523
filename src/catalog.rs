// catalog.rs — The loaded movie list and the user's favorites.
//
// The catalog is read exactly once at startup, from a local JSON file or an
// http(s) URL, and never changes afterwards. Favorites are the only mutable
// part and every toggle is written through to storage before returning.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use crate::error::DataLoadError;
use crate::models::{CatalogDocument, MovieId, MovieRecord};
use crate::persistence::{FavoriteSet, FavoritesStore};

/// Where `movies.json` lives.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// `http://` and `https://` strings are URLs, everything else is a path.
    pub fn parse(input: &str) -> Self {
        if is_remote_url(input) {
            CatalogSource::Url(input.to_string())
        } else {
            CatalogSource::File(PathBuf::from(input))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url)   => write!(f, "{url}"),
        }
    }
}

fn is_remote_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read and validate the catalog document.
pub fn load_movies(source: &CatalogSource) -> Result<Vec<MovieRecord>, DataLoadError> {
    let document: CatalogDocument = match source {
        CatalogSource::File(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        }
        CatalogSource::Url(url) => fetch_remote(url)?,
    };
    validate_ids(&document.movies)?;
    Ok(document.movies)
}

fn fetch_remote(url: &str) -> Result<CatalogDocument, DataLoadError> {
    // ureq reports non-2xx responses as `Error::Status`.
    let response = match ureq::get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => {
            return Err(DataLoadError::Status { code, url: url.to_string() });
        }
        Err(e) => return Err(DataLoadError::Transport(e.to_string())),
    };
    let document = serde_json::from_reader(response.into_reader())?;
    Ok(document)
}

fn validate_ids(movies: &[MovieRecord]) -> Result<(), DataLoadError> {
    let mut seen = HashSet::with_capacity(movies.len());
    for movie in movies {
        if movie.id == 0 {
            return Err(DataLoadError::InvalidId { title: movie.title.clone() });
        }
        if !seen.insert(movie.id) {
            return Err(DataLoadError::DuplicateId(movie.id));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Catalog store
// ---------------------------------------------------------------------------

pub struct Catalog {
    movies:    Vec<MovieRecord>,
    favorites: FavoriteSet,
    store:     FavoritesStore,
}

impl Catalog {
    /// Load the movie list and the persisted favorites.
    pub fn load(source: &CatalogSource, store: FavoritesStore) -> Result<Self, DataLoadError> {
        let movies = load_movies(source)?;
        log::info!("loaded {} movies from {source}", movies.len());
        Ok(Self::from_movies(movies, store))
    }

    /// Build from an already-validated movie list.
    pub fn from_movies(movies: Vec<MovieRecord>, store: FavoritesStore) -> Self {
        let favorites = store.load();
        Self { movies, favorites, store }
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn find_by_id(&self, id: MovieId) -> Option<&MovieRecord> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.favorites.contains(id)
    }

    /// Flip membership and persist. Returns the new membership, or `None` when
    /// the id is not in the catalog (nothing changes then).
    pub fn toggle_favorite(&mut self, id: MovieId) -> Option<bool> {
        let now_favorite = if self.favorites.remove(id).is_some() {
            false
        } else {
            let movie = self.find_by_id(id)?.clone();
            self.favorites.insert(movie);
            true
        };

        if let Err(e) = self.store.save(&self.favorites) {
            log::warn!("could not persist favorites after toggling {id}: {e}");
        }
        log::debug!("movie {id} favorite = {now_favorite}");
        Some(now_favorite)
    }

    /// Distinct release years, newest first.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.movies.iter().map(|m| m.year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }

    /// Distinct categories, alphabetical.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.movies.iter().map(|m| m.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }
}
