// End-to-end flows through the controller, the way the page drives it.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use sauflix_lib::app::{App, Render, Screen};
use sauflix_lib::catalog::{load_movies, CatalogSource};
use sauflix_lib::config::Config;
use sauflix_lib::db::{KeyValueStore, MemoryStore, SqliteStore};
use sauflix_lib::error::{AppError, DataLoadError};
use sauflix_lib::models::{FeedbackForm, MovieRecord, SortKey};
use sauflix_lib::persistence::{FAVORITES_KEY, FEEDBACKS_KEY};
use sauflix_lib::router::ViewState;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/movies.json")
}

fn movies() -> Vec<MovieRecord> {
    load_movies(&CatalogSource::File(fixture())).expect("fixture catalog loads")
}

fn app_with(store: &MemoryStore) -> App {
    App::new(movies(), store, &Config::default())
}

fn home(render: &Render) -> &sauflix_lib::app::HomeView {
    match &render.screen {
        Screen::Home(h) => h,
        other => panic!("expected home, got {other:?}"),
    }
}

fn titles(render: &Render) -> Vec<String> {
    home(render).cards.iter().map(|c| c.movie.title.clone()).collect()
}

#[test]
fn fourteen_movies_paginate_twelve_then_two() {
    let mut app = app_with(&MemoryStore::new());

    let first = app.render();
    let h = home(&first);
    assert_eq!(h.cards.len(), 12);
    assert_eq!((h.current_page, h.total_pages), (1, 2));
    assert!(!h.has_prev && h.has_next);
    assert_eq!(h.page_info, "1 / 2");

    let second = app.next_page();
    let h = home(&second);
    assert_eq!(h.cards.len(), 2);
    assert!(h.has_prev && !h.has_next);

    // already on the last page: stays clamped
    let again = app.next_page();
    assert_eq!(home(&again).current_page, 2);
    assert_eq!(app.query().current_page, 2);
}

#[test]
fn page_size_change_resets_and_shrinks_pages() {
    let mut app = app_with(&MemoryStore::new());
    app.next_page();
    let r = app.set_page_size(24);
    let h = home(&r);
    assert_eq!((h.current_page, h.total_pages), (1, 1));
    assert_eq!(h.cards.len(), 14);
}

#[test]
fn debounced_search_fires_once_after_typing_stops() {
    let mut app = app_with(&MemoryStore::new());
    let t0 = Instant::now();
    let ms = Duration::from_millis;

    app.search_input("d", t0);
    app.search_input("da", t0 + ms(120));
    app.search_input("dark", t0 + ms(250));
    assert!(app.tick(t0 + ms(400)).is_none());

    let r = app.tick(t0 + ms(550)).expect("debounced search runs");
    assert_eq!(titles(&r), ["The Dark Knight", "Dark Waters"]);
    assert!(app.tick(t0 + ms(900)).is_none());
}

#[test]
fn enter_applies_search_immediately_and_drops_the_timer() {
    let mut app = app_with(&MemoryStore::new());
    let t0 = Instant::now();
    app.search_input("sig", t0);
    let r = app.submit_search("signs");
    assert_eq!(titles(&r), ["Signs"]);
    assert!(!app.debouncer().is_pending());
    assert!(app.tick(t0 + Duration::from_secs(5)).is_none());
}

#[test]
fn category_year_and_sort_combine() {
    let mut app = app_with(&MemoryStore::new());
    app.set_category(Some("Drama"));
    let r = app.set_year(Some("2010"));
    assert_eq!(titles(&r), ["The Social Network", "The King's Speech"]);

    let r = app.set_sort(SortKey::TitleAsc);
    assert_eq!(titles(&r), ["The King's Speech", "The Social Network"]);

    app.set_year(None);
    let r = app.set_sort(SortKey::RatingDesc);
    assert_eq!(
        titles(&r),
        ["Whiplash", "The King's Speech", "The Social Network", "Dark Waters"]
    );
}

#[test]
fn empty_search_shows_no_results_page() {
    let mut app = app_with(&MemoryStore::new());
    let r = app.submit_search("no such film");
    let h = home(&r);
    assert!(h.no_results);
    assert_eq!((h.current_page, h.total_pages), (1, 1));
}

#[test]
fn details_back_and_fragment_sync() {
    let mut app = app_with(&MemoryStore::new());

    app.navigate(ViewState::Favorites);
    let r = app.show_details(5);
    assert_eq!(r.fragment, "movie-5");
    assert!(r.sections.details && !r.sections.content);
    match &r.screen {
        Screen::Details(d) => {
            assert_eq!(d.movie.title, "Pulp Fiction");
            assert_eq!(
                d.trailer_embed.as_deref(),
                Some("https://www.youtube.com/embed/s7EdQ4FqbhY?modestbranding=1&rel=0&iv_load_policy=3&playsinline=1")
            );
            let samuel = d.cast.iter().find(|c| c.name == "Samuel L. Jackson").unwrap();
            assert_eq!(samuel.image_candidates[0], "images/Samuel_L_Jackson.jpg");
        }
        other => panic!("expected details, got {other:?}"),
    }

    // the page writes #movie-5 and the hashchange echoes back
    assert!(app.fragment_changed("#movie-5").is_none());
    assert_eq!(app.view(), ViewState::Details(5));

    let r = app.back();
    assert_eq!(r.view, ViewState::Favorites);
}

#[test]
fn back_to_home_reruns_from_page_one_and_ignores_its_echo() {
    let mut app = app_with(&MemoryStore::new());
    app.next_page();
    app.show_details(14);

    let r = app.back();
    assert_eq!(r.fragment, "home");
    assert!(r.sections.content);
    assert_eq!(home(&r).current_page, 1);
    assert!(app.fragment_changed("#home").is_none());
}

#[test]
fn external_fragments_are_decoded_with_fallback() {
    let mut app = app_with(&MemoryStore::new());

    let r = app.fragment_changed("#movie-8").unwrap();
    assert_eq!(r.view, ViewState::Details(8));

    let r = app.fragment_changed("#movie-notanumber").unwrap();
    assert_eq!(r.view, ViewState::Home);
    assert_eq!(r.fragment, "home");

    let r = app.fragment_changed("#feedback").unwrap();
    assert!(r.sections.feedback);

    let r = app.fragment_changed("#movie-4040").unwrap();
    assert_eq!(r.view, ViewState::Home);

    let r = app.show_details(4040);
    assert_eq!(r.view, ViewState::Home);
}

#[test]
fn returning_home_reruns_the_query_from_page_one() {
    let mut app = app_with(&MemoryStore::new());
    app.next_page();
    app.navigate(ViewState::Feedback);
    let r = app.navigate(ViewState::Home);
    assert_eq!(home(&r).current_page, 1);
}

#[test]
fn favorites_toggle_persists_and_is_its_own_inverse() {
    let kv = MemoryStore::new();
    let mut app = app_with(&kv);

    let r = app.toggle_favorite(2);
    assert!(home(&r).cards.iter().any(|c| c.movie.id == 2 && c.is_favorite));
    assert!(kv.get_item(FAVORITES_KEY).unwrap().unwrap().contains("The Dark Knight"));

    // a second session sees it
    let mut later = app_with(&kv);
    let r = later.navigate(ViewState::Favorites);
    match &r.screen {
        Screen::Favorites(f) => {
            assert_eq!(f.cards.len(), 1);
            assert!(!f.empty);
        }
        other => panic!("expected favorites, got {other:?}"),
    }

    // removing from the favorites page shrinks the list in place
    let r = later.toggle_favorite(2);
    match &r.screen {
        Screen::Favorites(f) => assert!(f.empty),
        other => panic!("expected favorites, got {other:?}"),
    }
    assert!(!later.catalog().is_favorite(2));
    assert_eq!(kv.get_item(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));

    // unknown ids change nothing
    later.toggle_favorite(999);
    assert_eq!(kv.get_item(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn short_feedback_is_rejected_and_valid_feedback_listed_newest_first() {
    let kv = MemoryStore::new();
    let mut app = app_with(&kv);
    app.navigate(ViewState::Feedback);
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    let mut form = FeedbackForm {
        name: "Mehmet Öz".to_string(),
        email: "mehmet@example.com".to_string(),
        topic: "content".to_string(),
        message: "Great".to_string(),
        rating: Some(5),
    };
    let outcome = app.submit_feedback(&form, now);
    assert!(!outcome.accepted);
    assert!(outcome.errors.message.is_some());
    assert_eq!(kv.get_item(FEEDBACKS_KEY).unwrap(), None);
    match &app.render().screen {
        Screen::Feedback(f) => {
            assert!(f.entries.is_empty());
            assert_eq!(f.errors.message.as_deref(), Some("Write at least 10 characters."));
        }
        other => panic!("expected feedback, got {other:?}"),
    }

    form.message = "Please add more Turkish films.".to_string();
    assert!(app.submit_feedback(&form, now).accepted);
    form.message = "The trailer for Signs is great.".to_string();
    assert!(app.submit_feedback(&form, now).accepted);

    match &app.render().screen {
        Screen::Feedback(f) => {
            assert_eq!(f.entries[0].message, "The trailer for Signs is great.");
            assert!(f.errors.message.is_none());
            assert_eq!(f.topics, ["suggestion", "bug", "content", "other"]);
        }
        other => panic!("expected feedback, got {other:?}"),
    }

    app.delete_feedback(0);
    let r = app.clear_feedback();
    match &r.screen {
        Screen::Feedback(f) => {
            assert!(f.entries.is_empty());
            assert_eq!(f.status, "All submissions cleared.");
        }
        other => panic!("expected feedback, got {other:?}"),
    }
    assert_eq!(kv.get_item(FEEDBACKS_KEY).unwrap(), None);
}

#[test]
fn startup_loads_catalog_and_sqlite_storage() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.catalog.source = fixture().display().to_string();
    config.storage.path = Some(dir.path().join("storage.db"));

    let mut app = App::startup(&config).unwrap();
    assert_eq!(app.catalog().movies().len(), 14);
    app.toggle_favorite(13);
    drop(app);

    let store = SqliteStore::open(&dir.path().join("storage.db")).unwrap();
    assert!(store.get_item(FAVORITES_KEY).unwrap().unwrap().contains("Amélie"));

    let app = App::startup(&config).unwrap();
    assert!(app.catalog().is_favorite(13));
}

#[test]
fn startup_fails_on_a_broken_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("movies.json");
    std::fs::write(&broken, r#"{"films": []}"#).unwrap();

    let mut config = Config::default();
    config.catalog.source = broken.display().to_string();
    config.storage.in_memory = true;

    assert!(matches!(
        App::startup(&config),
        Err(AppError::DataLoad(DataLoadError::Parse(_)))
    ));
}

#[test]
fn shipped_catalog_posters_exist() {
    let ui = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("ui");
    let movies = load_movies(&CatalogSource::File(ui.join("data/movies.json"))).unwrap();
    assert_eq!(movies.len(), 14);
    for movie in &movies {
        assert!(ui.join(&movie.image).is_file(), "missing poster {}", movie.image);
    }
}
