// query.rs — The filter → sort → paginate pipeline behind the home grid.
//
// `run` is pure: it never touches the QueryState it is given. The page number
// it settles on (after clamping) is returned in `PageResult::current_page` and
// the caller writes it back.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{MovieRecord, QueryState, SortKey};

/// One page of the filtered, sorted catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub items:         Vec<MovieRecord>,
    pub total_pages:   usize,
    pub current_page:  usize,
    pub total_matches: usize,
}

pub fn run(all: &[MovieRecord], state: &QueryState) -> PageResult {
    let filtered = filter(all, state);
    let sorted = sort(filtered, state.sort_key);
    paginate(&sorted, state.page_size, state.current_page)
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Keep the records matching the search term, category and year, in catalog order.
pub fn filter<'a>(all: &'a [MovieRecord], state: &QueryState) -> Vec<&'a MovieRecord> {
    let needle = state.search_term.trim().to_lowercase();
    let year = state.year.as_deref().map(str::trim);

    all.iter()
        .filter(|m| needle.is_empty() || m.title.to_lowercase().contains(&needle))
        .filter(|m| state.category.as_deref().map_or(true, |c| m.category == c))
        .filter(|m| year.map_or(true, |y| m.year.to_string() == y))
        .collect()
}

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

/// Stable sort; records with equal keys keep their relative order.
pub fn sort(mut movies: Vec<&MovieRecord>, key: SortKey) -> Vec<&MovieRecord> {
    // RUST NOTE: `sort_by` is a stable merge sort; `sort_unstable_by` would
    // be allowed to reorder ties and break page-to-page determinism.
    match key {
        SortKey::None       => {}
        SortKey::TitleAsc   => movies.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortKey::TitleDesc  => movies.sort_by(|a, b| compare_titles(&b.title, &a.title)),
        SortKey::YearAsc    => movies.sort_by(|a, b| a.year.cmp(&b.year)),
        SortKey::YearDesc   => movies.sort_by(|a, b| b.year.cmp(&a.year)),
        SortKey::RatingAsc  => movies.sort_by(|a, b| compare_ratings(a.rating, b.rating)),
        SortKey::RatingDesc => movies.sort_by(|a, b| compare_ratings(b.rating, a.rating)),
    }
    movies
}

fn compare_ratings(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Dictionary order, compared level by level like a collator:
///   1. base letters, case-insensitive, accents folded ("Çocuk" sits between
///      "Cars" and "Dune"); whitespace < punctuation < digits < letters
///   2. unaccented before accented
///   3. lower case before upper case
/// and only then the raw text.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    primary_keys(a)
        .cmp(primary_keys(b))
        .then_with(|| accent_marks(a).cmp(accent_marks(b)))
        .then_with(|| case_marks(a).cmp(case_marks(b)))
        .then_with(|| a.cmp(b))
}

fn primary_keys(s: &str) -> impl Iterator<Item = (u8, char)> + '_ {
    s.chars()
        .flat_map(|c| strip_accent(c).to_lowercase())
        .map(|c| (char_class(c), c))
}

fn accent_marks(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(|c| strip_accent(c) != c)
}

fn case_marks(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(char::is_uppercase)
}

fn char_class(c: char) -> u8 {
    if c.is_whitespace() {
        0
    } else if c.is_alphabetic() {
        3
    } else if c.is_numeric() {
        2
    } else {
        1
    }
}

/// Base letter of an accented Latin/Turkish letter; anything else unchanged.
fn strip_accent(c: char) -> char {
    match c {
        'Ç' | 'ç' | 'Ć' | 'ć' | 'Č' | 'č' => 'c',
        'Ğ' | 'ğ' => 'g',
        'İ' | 'ı' | 'Í' | 'í' | 'Ì' | 'ì' | 'Î' | 'î' | 'Ï' | 'ï' => 'i',
        'Ö' | 'ö' | 'Ó' | 'ó' | 'Ò' | 'ò' | 'Ô' | 'ô' | 'Õ' | 'õ' | 'Ø' | 'ø' => 'o',
        'Ş' | 'ş' | 'Š' | 'š' | 'Ś' | 'ś' => 's',
        'Ü' | 'ü' | 'Ú' | 'ú' | 'Ù' | 'ù' | 'Û' | 'û' => 'u',
        'Á' | 'á' | 'À' | 'à' | 'Â' | 'â' | 'Ä' | 'ä' | 'Ã' | 'ã' | 'Å' | 'å' => 'a',
        'É' | 'é' | 'È' | 'è' | 'Ê' | 'ê' | 'Ë' | 'ë' => 'e',
        'Ñ' | 'ñ' => 'n',
        'Ž' | 'ž' => 'z',
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Paginate
// ---------------------------------------------------------------------------

pub fn total_pages(count: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    count.div_ceil(size).max(1)
}

/// Slice out one page, clamping the requested page into `[1, total_pages]`.
pub fn paginate(movies: &[&MovieRecord], page_size: usize, page: usize) -> PageResult {
    let size = page_size.max(1);
    let total_pages = total_pages(movies.len(), size);
    let current_page = page.clamp(1, total_pages);

    let start = (current_page - 1) * size;
    let end = (start + size).min(movies.len());
    let items = movies
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .map(|m| (*m).clone())
        .collect();

    PageResult {
        items,
        total_pages,
        current_page,
        total_matches: movies.len(),
    }
}
