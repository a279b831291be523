// app.rs — The application controller.
//
// `App` owns every piece of mutable state (catalog + favorites, the home
// grid's query, the router, the feedback book, the search debouncer). Each
// handler finishes updating that state before it returns and hands back a
// `Render`: a plain snapshot of the visible view for the page to paint.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::db::{KeyValueStore, MemoryStore, SqliteStore};
use crate::debounce::Debouncer;
use crate::error::AppError;
use crate::feedback::{FeedbackBook, FieldErrors, SubmitOutcome};
use crate::images;
use crate::models::{
    FeedbackEntry, FeedbackForm, FeedbackTopic, MovieId, MovieRecord, QueryState, SortKey,
};
use crate::persistence::{FavoritesStore, FeedbackStore};
use crate::query;
use crate::router::{Router, Sections, ViewState};

// ---------------------------------------------------------------------------
// Snapshots handed to the page
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MovieCard {
    #[serde(flatten)]
    pub movie:       MovieRecord,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct HomeView {
    pub cards:             Vec<MovieCard>,
    pub current_page:      usize,
    pub total_pages:       usize,
    pub total_matches:     usize,
    pub has_prev:          bool,
    pub has_next:          bool,
    pub no_results:        bool,
    pub page_info:         String,   // "1 / 2"
    pub query:             QueryState,
    pub categories:        Vec<String>,
    pub years:             Vec<i32>,
    pub page_size_options: Vec<usize>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CastMember {
    pub name:             String,
    pub image_candidates: Vec<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DetailView {
    pub movie:         MovieRecord,
    pub is_favorite:   bool,
    pub trailer_embed: Option<String>,
    pub cast:          Vec<CastMember>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FavoritesView {
    pub cards: Vec<MovieCard>,
    pub empty: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FeedbackView {
    pub entries: Vec<FeedbackEntry>,   // newest first
    pub status:  String,
    pub errors:  FieldErrors,
    pub topics:  Vec<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Screen {
    Home(HomeView),
    Details(DetailView),
    Favorites(FavoritesView),
    Feedback(FeedbackView),
}

/// Everything the page needs to paint after an event.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Render {
    pub view:     ViewState,
    pub fragment: String,
    pub sections: Sections,
    pub screen:   Screen,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct App {
    catalog:           Catalog,
    query:             QueryState,
    router:            Router,
    feedback:          FeedbackBook,
    feedback_errors:   FieldErrors,
    debouncer:         Debouncer,
    pending_search:    Option<String>,
    page_size_options: Vec<usize>,
}

/// Open the configured store; a store that can't be opened degrades to an
/// in-memory one for this session.
fn open_store(config: &Config) -> Box<dyn CloneableStore> {
    if config.storage.in_memory {
        return Box::new(MemoryStore::new());
    }
    let path = config.storage_path();
    match SqliteStore::open(&path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!(
                "could not open storage at {}, favorites and feedback won't persist: {e}",
                path.display()
            );
            Box::new(MemoryStore::new())
        }
    }
}

/// A store that can hand out boxed handles to itself, one per adapter.
pub trait CloneableStore: KeyValueStore {
    fn boxed(&self) -> Box<dyn KeyValueStore>;
}

impl<T: KeyValueStore + Clone + 'static> CloneableStore for T {
    fn boxed(&self) -> Box<dyn KeyValueStore> {
        Box::new(self.clone())
    }
}

impl App {
    /// Load config-driven storage and the catalog. A catalog that can't be
    /// loaded stops startup; nothing partial is ever shown.
    pub fn startup(config: &Config) -> Result<Self, AppError> {
        let store = open_store(config);
        let source = config.catalog_source();
        let catalog = Catalog::load(&source, FavoritesStore::new(store.boxed())).map_err(|e| {
            log::error!("could not load movie catalog from {source}: {e}");
            e
        })?;
        let feedback = FeedbackStore::load(store.boxed());
        Ok(Self::from_parts(catalog, feedback, config))
    }

    /// Build around an already-loaded movie list.
    pub fn new(movies: Vec<MovieRecord>, store: &dyn CloneableStore, config: &Config) -> Self {
        let catalog = Catalog::from_movies(movies, FavoritesStore::new(store.boxed()));
        let feedback = FeedbackStore::load(store.boxed());
        Self::from_parts(catalog, feedback, config)
    }

    fn from_parts(catalog: Catalog, feedback: FeedbackStore, config: &Config) -> Self {
        Self {
            catalog,
            query: QueryState::with_page_size(config.query.page_size),
            router: Router::new(),
            feedback: FeedbackBook::new(feedback),
            feedback_errors: FieldErrors::default(),
            debouncer: Debouncer::new(config.debounce_delay()),
            pending_search: None,
            page_size_options: config.query.page_size_options.clone(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn view(&self) -> ViewState {
        self.router.current()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    // -- search & filters ---------------------------------------------------

    /// A keystroke in the search box. Nothing is recomputed until `tick`
    /// finds the debounce delay elapsed.
    pub fn search_input(&mut self, text: &str, now: Instant) {
        self.pending_search = Some(text.to_string());
        self.debouncer.schedule(now);
    }

    /// Apply a debounced search if it's due. Returns a render only when the
    /// home grid is the visible view.
    pub fn tick(&mut self, now: Instant) -> Option<Render> {
        if !self.debouncer.fire_if_due(now) {
            return None;
        }
        if let Some(term) = self.pending_search.take() {
            self.query.set_search_term(&term);
        }
        let render = self.render();
        (self.view() == ViewState::Home).then_some(render)
    }

    /// Enter key / search button: apply immediately, dropping any pending timer.
    pub fn submit_search(&mut self, text: &str) -> Render {
        self.debouncer.cancel();
        self.pending_search = None;
        self.query.set_search_term(text);
        self.render()
    }

    pub fn set_category(&mut self, category: Option<&str>) -> Render {
        self.query.set_category(category);
        self.render()
    }

    pub fn set_year(&mut self, year: Option<&str>) -> Render {
        self.query.set_year(year);
        self.render()
    }

    pub fn set_sort(&mut self, key: SortKey) -> Render {
        self.query.set_sort_key(key);
        self.render()
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Render {
        self.query.set_page_size(page_size);
        self.render()
    }

    pub fn next_page(&mut self) -> Render {
        self.query.next_page();
        self.render()
    }

    pub fn prev_page(&mut self) -> Render {
        self.query.prev_page();
        self.render()
    }

    // -- navigation ---------------------------------------------------------

    pub fn navigate(&mut self, target: ViewState) -> Render {
        let target = target.resolve(|id| self.catalog.find_by_id(id).is_some());
        if target == ViewState::Home {
            self.query.current_page = 1;
        }
        self.router.navigate(target);
        self.render()
    }

    pub fn show_details(&mut self, id: MovieId) -> Render {
        self.navigate(ViewState::Details(id))
    }

    /// Return to the list the detail page was opened from. List views are
    /// never `Details`, so there is nothing to resolve.
    pub fn back(&mut self) -> Render {
        let transition = self.router.back();
        if transition.view == ViewState::Home {
            self.query.current_page = 1;
        }
        self.render()
    }

    /// The browser's hash changed. `None` when it is our own write echoing back
    /// or already the visible view.
    pub fn fragment_changed(&mut self, fragment: &str) -> Option<Render> {
        let catalog = &self.catalog;
        let transition = self
            .router
            .fragment_changed(fragment, |id| catalog.find_by_id(id).is_some())?;
        if transition.view == ViewState::Home {
            self.query.current_page = 1;
        }
        Some(self.render())
    }

    // -- favorites ----------------------------------------------------------

    /// Toggle and re-render whatever is showing (the favorites list shrinks in
    /// place, a detail page flips its button).
    pub fn toggle_favorite(&mut self, id: MovieId) -> Render {
        self.catalog.toggle_favorite(id);
        self.render()
    }

    // -- feedback -----------------------------------------------------------

    pub fn submit_feedback(&mut self, form: &FeedbackForm, now: DateTime<Utc>) -> SubmitOutcome {
        let outcome = self.feedback.submit(form, now);
        self.feedback_errors = outcome.errors.clone();
        outcome
    }

    pub fn delete_feedback(&mut self, display_index: usize) -> Render {
        self.feedback.delete_displayed(display_index);
        self.render()
    }

    pub fn clear_feedback(&mut self) -> Render {
        self.feedback.clear();
        self.render()
    }

    // -- rendering ----------------------------------------------------------

    /// Snapshot of the visible view. Rendering home runs the query pipeline
    /// and writes the clamped page back into the query state.
    pub fn render(&mut self) -> Render {
        let view = self.router.current();
        let screen = match view {
            ViewState::Home => Screen::Home(self.home_view()),
            ViewState::Details(id) => match self.detail_view(id) {
                Some(detail) => Screen::Details(detail),
                None => Screen::Home(self.home_view()),
            },
            ViewState::Favorites => Screen::Favorites(self.favorites_view()),
            ViewState::Feedback => Screen::Feedback(self.feedback_view()),
        };
        Render {
            view,
            fragment: view.to_fragment(),
            sections: Sections::from(view),
            screen,
        }
    }

    fn card(&self, movie: MovieRecord) -> MovieCard {
        let is_favorite = self.catalog.is_favorite(movie.id);
        MovieCard { movie, is_favorite }
    }

    fn home_view(&mut self) -> HomeView {
        let page = query::run(self.catalog.movies(), &self.query);
        self.query.current_page = page.current_page;
        log::debug!(
            "query {:?}: {} matches, page {}/{}",
            self.query.search_term,
            page.total_matches,
            page.current_page,
            page.total_pages
        );

        HomeView {
            no_results: page.items.is_empty(),
            cards: page.items.into_iter().map(|m| self.card(m)).collect(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_matches: page.total_matches,
            has_prev: page.current_page > 1,
            has_next: page.current_page < page.total_pages,
            page_info: format!("{} / {}", page.current_page, page.total_pages),
            query: self.query.clone(),
            categories: self.catalog.categories(),
            years: self.catalog.years(),
            page_size_options: self.page_size_options.clone(),
        }
    }

    fn detail_view(&self, id: MovieId) -> Option<DetailView> {
        let movie = self.catalog.find_by_id(id)?.clone();
        let cast = movie
            .cast
            .iter()
            .map(|name| CastMember {
                name: name.clone(),
                image_candidates: images::actor_image_candidates(name),
            })
            .collect();
        Some(DetailView {
            is_favorite: self.catalog.is_favorite(id),
            trailer_embed: images::trailer_embed(movie.trailer.as_deref()),
            cast,
            movie,
        })
    }

    fn favorites_view(&self) -> FavoritesView {
        let cards: Vec<MovieCard> = self
            .catalog
            .favorites()
            .movies()
            .iter()
            .map(|m| MovieCard { movie: m.clone(), is_favorite: true })
            .collect();
        FavoritesView { empty: cards.is_empty(), cards }
    }

    fn feedback_view(&self) -> FeedbackView {
        FeedbackView {
            entries: self.feedback.newest_first(),
            status: self.feedback.status().to_string(),
            errors: self.feedback_errors.clone(),
            topics: FeedbackTopic::ALL.iter().map(|t| t.as_str().to_string()).collect(),
        }
    }
}
