use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::infra::app_state::AppState;

pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "startedAt": state.started_at.to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions().len(),
        "mintEnabled": state.config().claim.client_id.is_some(),
    }))
}
