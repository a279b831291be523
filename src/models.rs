// models.rs — All data types for Sauflix.
//
// RUST NOTE: `derive` macros auto-generate trait implementations for us.
//   - `Serialize / Deserialize` (from serde) let these structs travel as JSON:
//     to and from the catalog file, the key-value store and the web view.
//   - `Debug`   lets you print them with `{:?}` for logging.
//   - `Clone`   lets you duplicate a value (Rust moves by default, unlike most languages).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary key of a movie in the loaded catalog.
pub type MovieId = u32;

// ---------------------------------------------------------------------------
// Catalog records
// ---------------------------------------------------------------------------

/// One film as it appears in `movies.json`. Never mutated after loading.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieRecord {
    pub id:          MovieId,
    pub title:       String,
    pub year:        i32,
    pub category:    String,
    pub rating:      f64,              // 0.0 – 10.0
    pub director:    String,
    pub description: String,
    #[serde(default)]
    pub cast:        Vec<String>,      // billing order
    pub image:       String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer:     Option<String>,
}

/// Shape of the static catalog document.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub movies: Vec<MovieRecord>,
}

// ---------------------------------------------------------------------------
// Query state
// ---------------------------------------------------------------------------

/// Sort orders offered by the sort dropdown.
/// The serde names are the dropdown's option values.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    #[serde(rename = "none", alias = "")]
    None,
    #[serde(rename = "title-asc")]
    TitleAsc,
    #[serde(rename = "title-desc")]
    TitleDesc,
    #[serde(rename = "year-asc")]
    YearAsc,
    #[serde(rename = "year-desc")]
    YearDesc,
    #[serde(rename = "rating-asc")]
    RatingAsc,
    #[serde(rename = "rating-desc")]
    RatingDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &str {
        match self {
            SortKey::None       => "none",
            SortKey::TitleAsc   => "title-asc",
            SortKey::TitleDesc  => "title-desc",
            SortKey::YearAsc    => "year-asc",
            SortKey::YearDesc   => "year-desc",
            SortKey::RatingAsc  => "rating-asc",
            SortKey::RatingDesc => "rating-desc",
        }
    }

    /// Parse a dropdown value. Anything unrecognised (including "") keeps
    /// the catalog order.
    pub fn from_str(s: &str) -> Self {
        match s.trim() {
            "title-asc"   => SortKey::TitleAsc,
            "title-desc"  => SortKey::TitleDesc,
            "year-asc"    => SortKey::YearAsc,
            "year-desc"   => SortKey::YearDesc,
            "rating-asc"  => SortKey::RatingAsc,
            "rating-desc" => SortKey::RatingDesc,
            _             => SortKey::None,
        }
    }
}

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Everything the home grid's controls contribute to the visible page.
///
/// Setters that change *what* is listed reset `current_page` to 1;
/// page navigation does not.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QueryState {
    pub search_term:  String,
    pub category:     Option<String>,
    pub year:         Option<String>,   // kept textual, compared as strings
    pub sort_key:     SortKey,
    pub page_size:    usize,
    pub current_page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term:  String::new(),
            category:     None,
            year:         None,
            sort_key:     SortKey::None,
            page_size:    DEFAULT_PAGE_SIZE,
            current_page: 1,
        }
    }
}

impl QueryState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self { page_size: page_size.max(1), ..Self::default() }
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.trim().to_string();
        self.current_page = 1;
    }

    /// An empty dropdown value means "all categories".
    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = non_empty(category);
        self.current_page = 1;
    }

    pub fn set_year(&mut self, year: Option<&str>) {
        self.year = non_empty(year);
        self.current_page = 1;
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.current_page = 1;
    }

    /// Zero is ignored; the page size is always positive.
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self.current_page = 1;
    }

    pub fn next_page(&mut self) {
        self.current_page += 1;
    }

    pub fn prev_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackTopic {
    Suggestion,
    Bug,
    Content,
    Other,
}

impl FeedbackTopic {
    pub const ALL: [FeedbackTopic; 4] = [
        FeedbackTopic::Suggestion,
        FeedbackTopic::Bug,
        FeedbackTopic::Content,
        FeedbackTopic::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            FeedbackTopic::Suggestion => "suggestion",
            FeedbackTopic::Bug        => "bug",
            FeedbackTopic::Content    => "content",
            FeedbackTopic::Other      => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s.trim())
    }
}

/// A stored feedback submission. Field names are camelCase on disk.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub name:       String,
    pub email:      String,
    pub topic:      FeedbackTopic,
    pub message:    String,
    pub rating:     u8,                 // 1 – 5
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
}

/// Raw form contents as typed by the user. Nothing here is validated yet.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct FeedbackForm {
    pub name:    String,
    pub email:   String,
    pub topic:   String,
    pub message: String,
    pub rating:  Option<u8>,
}
