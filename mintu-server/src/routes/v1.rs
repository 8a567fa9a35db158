use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, handlers::sessions};

pub const SESSIONS: &str = "/sessions";
pub const SESSION: &str = "/sessions/{id}";

/// Create all v1 API routes
pub fn create_v1_router(_state: AppState) -> Router<AppState> {
    Router::new()
        .route(SESSIONS, post(sessions::create_session))
        .route(
            SESSION,
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route(
            "/sessions/{id}/images/broken",
            post(sessions::report_broken_image),
        )
        .route("/sessions/{id}/wallet", post(sessions::report_wallet))
        .route("/sessions/{id}/connect", post(sessions::connect))
        .route("/sessions/{id}/share", post(sessions::share))
        .route("/sessions/{id}/claim", post(sessions::report_claim))
        .route(
            "/sessions/{id}/notification/dismiss",
            post(sessions::dismiss_notification),
        )
        .route("/sessions/{id}/outbox", post(sessions::drain_outbox))
}
