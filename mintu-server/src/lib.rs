//! # Mint U Server
//!
//! Serves the Mint U mini app page and keeps one mounted view per open page.
//!
//! The page script opens a session on load, relays what the host SDK and the
//! wallet report, and deletes the session on unload. Sessions the script
//! forgets about are reaped once idle.

pub mod handlers;
pub mod infra;
pub mod relay;
pub mod routes;
pub mod sessions;

use std::path::Path;

use axum::{Router, routing::get};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir,
    trace::TraceLayer,
};

pub use infra::app_state::AppState;

use handlers::{health, page};

/// Assemble the full router: page, health, static assets and the API.
pub fn create_app(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/", get(page::index))
        .route(page::SCRIPT_PATH, get(page::script))
        .route("/healthz", get(health::healthz))
        .merge(routes::create_api_router(state.clone()));

    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(infra::panic::handle_panic))
        .with_state(state)
}
