// commands.rs — Tauri command handlers.
//
// These functions are the page's API. The frontend calls them with:
//   const render = await window.__TAURI__.core.invoke("navigate", { view: { view: "favorites" } });
//
// RUST NOTE: `#[tauri::command]` is a procedural macro that transforms this function
// into something Tauri can call from JavaScript via IPC (inter-process communication).
// Tauri automatically serializes return values to JSON and deserializes arguments from JSON.
// Argument names arrive camelCased from JS (`page_size` ← `pageSize`).

use std::sync::Mutex;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager, State};

use sauflix_lib::app::{App, Render};
use sauflix_lib::feedback::{self, SubmitOutcome};
use sauflix_lib::models::{FeedbackForm, MovieId, SortKey};
use sauflix_lib::router::ViewState;

/// Event carrying a render produced outside a command (debounced search).
pub const RENDER_EVENT: &str = "render";

/// The controller, one event at a time.
pub struct AppState {
    pub app: Mutex<App>,
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

// Tauri commands must return `Result<T, E>` where E implements `serde::Serialize`
// so errors can be sent back to JavaScript as JSON.
#[derive(Debug, Serialize)]
pub struct CommandError(String);

type CmdResult<T> = Result<T, CommandError>;

// Macro to lock the Mutex and propagate the error if poisoned
macro_rules! app {
    ($state:expr) => {
        $state
            .app
            .lock()
            .map_err(|e| CommandError(format!("app state lock poisoned: {e}")))?
    };
}

// ---------------------------------------------------------------------------
// Snapshot & navigation
// ---------------------------------------------------------------------------

/// Current view, used by the page on first paint.
#[tauri::command]
pub fn snapshot(state: State<AppState>) -> CmdResult<Render> {
    Ok(app!(state).render())
}

#[tauri::command]
pub fn navigate(state: State<AppState>, view: ViewState) -> CmdResult<Render> {
    Ok(app!(state).navigate(view))
}

#[tauri::command]
pub fn show_details(state: State<AppState>, id: MovieId) -> CmdResult<Render> {
    Ok(app!(state).show_details(id))
}

#[tauri::command]
pub fn go_back(state: State<AppState>) -> CmdResult<Render> {
    Ok(app!(state).back())
}

/// `None` means the page should leave everything as it is.
#[tauri::command]
pub fn fragment_changed(state: State<AppState>, fragment: String) -> CmdResult<Option<Render>> {
    Ok(app!(state).fragment_changed(&fragment))
}

// ---------------------------------------------------------------------------
// Search, filters, paging
// ---------------------------------------------------------------------------

/// A keystroke. Arms the debounce timer; the resulting render arrives later as
/// a `render` event, and only if no newer keystroke superseded this one.
#[tauri::command]
pub fn search_input(handle: AppHandle, state: State<AppState>, text: String) -> CmdResult<()> {
    let delay = {
        let mut app = app!(state);
        app.search_input(&text, Instant::now());
        app.debouncer().delay()
    };

    std::thread::spawn(move || {
        std::thread::sleep(delay);
        let state = handle.state::<AppState>();
        let render = match state.app.lock() {
            Ok(mut app) => app.tick(Instant::now()),
            Err(e) => {
                log::error!("app state lock poisoned: {e}");
                None
            }
        };
        if let Some(render) = render {
            if let Err(e) = handle.emit(RENDER_EVENT, render) {
                log::warn!("could not deliver debounced search results: {e}");
            }
        }
    });
    Ok(())
}

#[tauri::command]
pub fn submit_search(state: State<AppState>, text: String) -> CmdResult<Render> {
    Ok(app!(state).submit_search(&text))
}

#[tauri::command]
pub fn set_category(state: State<AppState>, category: Option<String>) -> CmdResult<Render> {
    Ok(app!(state).set_category(category.as_deref()))
}

#[tauri::command]
pub fn set_year(state: State<AppState>, year: Option<String>) -> CmdResult<Render> {
    Ok(app!(state).set_year(year.as_deref()))
}

#[tauri::command]
pub fn set_sort(state: State<AppState>, sort: String) -> CmdResult<Render> {
    Ok(app!(state).set_sort(SortKey::from_str(&sort)))
}

#[tauri::command]
pub fn set_page_size(state: State<AppState>, page_size: usize) -> CmdResult<Render> {
    Ok(app!(state).set_page_size(page_size))
}

#[tauri::command]
pub fn next_page(state: State<AppState>) -> CmdResult<Render> {
    Ok(app!(state).next_page())
}

#[tauri::command]
pub fn prev_page(state: State<AppState>) -> CmdResult<Render> {
    Ok(app!(state).prev_page())
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

#[tauri::command]
pub fn toggle_favorite(state: State<AppState>, id: MovieId) -> CmdResult<Render> {
    Ok(app!(state).toggle_favorite(id))
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct FeedbackSubmitted {
    pub outcome: SubmitOutcome,
    pub render:  Render,
}

#[tauri::command]
pub fn submit_feedback(state: State<AppState>, form: FeedbackForm) -> CmdResult<FeedbackSubmitted> {
    let mut app = app!(state);
    let outcome = app.submit_feedback(&form, Utc::now());
    Ok(FeedbackSubmitted { outcome, render: app.render() })
}

#[tauri::command]
pub fn delete_feedback(state: State<AppState>, index: usize) -> CmdResult<Render> {
    Ok(app!(state).delete_feedback(index))
}

#[tauri::command]
pub fn clear_feedback(state: State<AppState>) -> CmdResult<Render> {
    Ok(app!(state).clear_feedback())
}

#[tauri::command]
pub fn message_counter(message: String) -> String {
    feedback::message_counter(&message)
}
