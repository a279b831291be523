// router.rs — Which page is showing, and its mirror in the URL fragment.
//
// Four views, exactly one visible. Every transition produces the canonical
// fragment for the new view; the page writes it to `location.hash`, and the
// resulting hashchange comes back through `fragment_changed`, which
// recognises its own echo and ignores it.

use serde::{Deserialize, Serialize};

use crate::models::MovieId;

const MOVIE_PREFIX: &str = "movie-";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(tag = "view", content = "id", rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Home,
    Details(MovieId),
    Favorites,
    Feedback,
}

impl ViewState {
    /// Canonical fragment, without the leading `#`.
    pub fn to_fragment(&self) -> String {
        match self {
            ViewState::Home        => "home".to_string(),
            ViewState::Details(id) => format!("{MOVIE_PREFIX}{id}"),
            ViewState::Favorites   => "favorites".to_string(),
            ViewState::Feedback    => "feedback".to_string(),
        }
    }

    /// Decode a fragment on its own, without checking the id exists.
    /// A malformed `movie-` id and anything unknown decode to `Home`.
    pub fn from_fragment(fragment: &str) -> Self {
        let fragment = fragment.trim().trim_start_matches('#');
        if let Some(rest) = fragment.strip_prefix(MOVIE_PREFIX) {
            // `parse` alone would also accept "+5"
            if !rest.bytes().all(|b| b.is_ascii_digit()) {
                return ViewState::Home;
            }
            return match rest.parse::<MovieId>() {
                Ok(id) if id > 0 => ViewState::Details(id),
                _ => ViewState::Home,
            };
        }
        match fragment {
            "favorites" => ViewState::Favorites,
            "feedback"  => ViewState::Feedback,
            _           => ViewState::Home,
        }
    }

    /// Replace a detail view whose id doesn't resolve with `Home`.
    pub fn resolve(self, exists: impl Fn(MovieId) -> bool) -> Self {
        match self {
            ViewState::Details(id) if !exists(id) => ViewState::Home,
            other => other,
        }
    }

    fn is_list(&self) -> bool {
        matches!(self, ViewState::Home | ViewState::Favorites)
    }
}

/// Visibility of the four page sections. Built only from a `ViewState`, so
/// exactly one flag is ever set.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Sections {
    pub content:   bool,
    pub details:   bool,
    pub favorites: bool,
    pub feedback:  bool,
}

impl From<ViewState> for Sections {
    fn from(view: ViewState) -> Self {
        Sections {
            content:   view == ViewState::Home,
            details:   matches!(view, ViewState::Details(_)),
            favorites: view == ViewState::Favorites,
            feedback:  view == ViewState::Feedback,
        }
    }
}

/// The result of entering a view: what to show and what to put in the URL.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Transition {
    pub view:     ViewState,
    pub fragment: String,
    pub sections: Sections,
}

#[derive(Debug)]
pub struct Router {
    current:      ViewState,
    list_context: ViewState,
    echo:         Option<String>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            current:      ViewState::Home,
            list_context: ViewState::Home,
            echo:         None,
        }
    }

    pub fn current(&self) -> ViewState {
        self.current
    }

    /// Enter `target`. Detail ids must already be resolved by the caller.
    pub fn navigate(&mut self, target: ViewState) -> Transition {
        if target.is_list() {
            self.list_context = target;
        }
        self.current = target;

        let fragment = target.to_fragment();
        self.echo = Some(fragment.clone());
        log::debug!("view -> {target:?} (#{fragment})");

        Transition {
            view: target,
            fragment,
            sections: Sections::from(target),
        }
    }

    /// Leave a detail page for the list it was opened from.
    pub fn back(&mut self) -> Transition {
        self.navigate(self.list_context)
    }

    /// React to an external hashchange. Returns `None` when the change is the
    /// echo of our own last write, or when it names the view already showing.
    pub fn fragment_changed(
        &mut self,
        fragment: &str,
        exists: impl Fn(MovieId) -> bool,
    ) -> Option<Transition> {
        let fragment = fragment.trim().trim_start_matches('#');
        // An echo that never arrived (the hash already had that value) is
        // dropped by the next change either way.
        if self.echo.take().as_deref() == Some(fragment) {
            return None;
        }

        let target = ViewState::from_fragment(fragment).resolve(exists);
        if target == self.current && fragment == target.to_fragment() {
            return None;
        }
        Some(self.navigate(target))
    }
}
