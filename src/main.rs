// main.rs — Tauri application entry point.
//
// This file wires everything together:
//   1. Reads the optional sauflix.toml and starts logging
//   2. Opens storage and loads the movie catalog (fatal if the catalog is bad)
//   3. Registers the Tauri commands so JavaScript can call them
//   4. Starts the Tauri event loop
#![windows_subsystem = "windows"]
mod commands;

use std::sync::Mutex;

use anyhow::Result;
use sauflix_lib::{App, Config};

use commands::AppState;

fn main() -> Result<()> {
    let config = Config::discover()?;

    // RUST_LOG wins over the configured level when set
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log.level.as_str()),
    )
    .init();

    // A catalog that can't be loaded has already been logged; stop here
    // rather than open a window onto an empty or partial library.
    let app = App::startup(&config)?;

    tauri::Builder::default()
        // The controller; commands receive it as State<AppState>
        .manage(AppState { app: Mutex::new(app) })

        // ── Register IPC commands ────────────────────────────────────────────
        .invoke_handler(tauri::generate_handler![
            // View routing
            commands::snapshot,
            commands::navigate,
            commands::show_details,
            commands::go_back,
            commands::fragment_changed,
            // Home grid
            commands::search_input,
            commands::submit_search,
            commands::set_category,
            commands::set_year,
            commands::set_sort,
            commands::set_page_size,
            commands::next_page,
            commands::prev_page,
            // Favorites
            commands::toggle_favorite,
            // Feedback
            commands::submit_feedback,
            commands::delete_feedback,
            commands::clear_feedback,
            commands::message_counter,
        ])

        // ── Start the event loop ─────────────────────────────────────────────
        .run(tauri::generate_context!())
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
