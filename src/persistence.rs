// persistence.rs — Favorites and feedback collections over a KeyValueStore.
//
// Reads never fail: a missing or unreadable record is an empty collection.
// Writes are synchronous and report their error, but callers treat them as
// best-effort and only log.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::KeyValueStore;
use crate::error::StorageError;
use crate::models::{FeedbackEntry, MovieId, MovieRecord};

pub const FAVORITES_KEY: &str = "favorites";
pub const FEEDBACKS_KEY: &str = "feedbacks";

fn read_list<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("could not read {key:?} from storage, starting empty: {e}");
            return Vec::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        log::warn!("stored {key:?} is corrupt, starting empty: {e}");
        Vec::new()
    })
}

fn write_list<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(items)?;
    store.set_item(key, &raw)
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// Movie snapshots captured when they were favorited, keyed by id and kept in
/// the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoriteSet {
    movies: Vec<MovieRecord>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a stored list, dropping repeated ids (first one wins).
    pub fn from_movies(movies: Vec<MovieRecord>) -> Self {
        let mut set = Self::new();
        for movie in movies {
            set.insert(movie);
        }
        set
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, movie: MovieRecord) -> bool {
        if self.contains(movie.id) {
            return false;
        }
        self.movies.push(movie);
        true
    }

    pub fn remove(&mut self, id: MovieId) -> Option<MovieRecord> {
        let pos = self.movies.iter().position(|m| m.id == id)?;
        Some(self.movies.remove(pos))
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

pub struct FavoritesStore {
    store: Box<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> FavoriteSet {
        let set = FavoriteSet::from_movies(read_list(self.store.as_ref(), FAVORITES_KEY));
        log::debug!("loaded {} favorites", set.len());
        set
    }

    pub fn save(&self, favorites: &FavoriteSet) -> Result<(), StorageError> {
        write_list(self.store.as_ref(), FAVORITES_KEY, favorites.movies())
    }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// The append-only feedback collection, oldest first, mirrored to storage
/// after every change.
pub struct FeedbackStore {
    store:   Box<dyn KeyValueStore>,
    entries: Vec<FeedbackEntry>,
}

impl FeedbackStore {
    /// Reads the stored collection once; later calls work on the cached copy.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let entries = read_list(store.as_ref(), FEEDBACKS_KEY);
        Self { store, entries }
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    pub fn append(&mut self, entry: FeedbackEntry) -> Result<(), StorageError> {
        self.entries.push(entry);
        self.persist()
    }

    /// Out-of-range indexes are ignored and return `Ok(None)`.
    pub fn remove_at(&mut self, index: usize) -> Result<Option<FeedbackEntry>, StorageError> {
        if index >= self.entries.len() {
            return Ok(None);
        }
        let removed = self.entries.remove(index);
        self.persist()?;
        Ok(Some(removed))
    }

    /// Drops the stored record altogether rather than writing an empty list.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.store.remove_item(FEEDBACKS_KEY)
    }

    fn persist(&self) -> Result<(), StorageError> {
        write_list(self.store.as_ref(), FEEDBACKS_KEY, &self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::FeedbackTopic;
    use chrono::{TimeZone, Utc};

    fn movie(id: MovieId, title: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            year: 2000,
            category: "Drama".to_string(),
            rating: 7.0,
            director: "Someone".to_string(),
            description: String::new(),
            cast: vec![],
            image: String::new(),
            trailer: None,
        }
    }

    fn entry(message: &str) -> FeedbackEntry {
        FeedbackEntry {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            topic: FeedbackTopic::Suggestion,
            message: message.to_string(),
            rating: 5,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn favorites_round_trip_through_storage() {
        let kv = MemoryStore::new();
        let store = FavoritesStore::new(Box::new(kv.clone()));
        assert!(store.load().is_empty());

        let mut set = FavoriteSet::new();
        set.insert(movie(1, "Inception"));
        set.insert(movie(2, "Signs"));
        store.save(&set).unwrap();

        let again = FavoritesStore::new(Box::new(kv)).load();
        assert_eq!(again, set);
    }

    #[test]
    fn corrupt_favorites_load_as_empty() {
        let kv = MemoryStore::new();
        kv.set_item(FAVORITES_KEY, "{not json").unwrap();
        assert!(FavoritesStore::new(Box::new(kv)).load().is_empty());
    }

    #[test]
    fn duplicate_stored_favorites_are_collapsed() {
        let set = FavoriteSet::from_movies(vec![movie(4, "A"), movie(4, "B"), movie(5, "C")]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.movies()[0].title, "A");
    }

    #[test]
    fn feedback_store_appends_removes_and_clears() {
        let kv = MemoryStore::new();
        let mut store = FeedbackStore::load(Box::new(kv.clone()));
        store.append(entry("first message here")).unwrap();
        store.append(entry("second message here")).unwrap();
        store.append(entry("third message here")).unwrap();

        let removed = store.remove_at(1).unwrap().unwrap();
        assert_eq!(removed.message, "second message here");
        assert_eq!(store.remove_at(9).unwrap(), None);

        let reloaded = FeedbackStore::load(Box::new(kv.clone()));
        let messages: Vec<_> = reloaded.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["first message here", "third message here"]);

        store.clear().unwrap();
        assert_eq!(kv.get_item(FEEDBACKS_KEY).unwrap(), None);
        assert!(FeedbackStore::load(Box::new(kv)).entries().is_empty());
    }
}
