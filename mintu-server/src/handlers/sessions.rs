//! Session endpoints: one per open page, driven by the page's script.

use std::sync::Arc;

use alloy_primitives::TxHash;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use mintu_core::{
    ViewSnapshot,
    claim::{ClaimError, TransactionConfirmation},
    host::HostContext,
    wallet::{ConnectionState, Connector},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    infra::{
        app_state::AppState,
        errors::{AppError, AppResult},
    },
    relay::ComposeIntent,
    sessions::{Session, SessionSeed},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub context: Option<HostContext>,
    #[serde(default)]
    pub wallet: Option<ConnectionState>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub snapshot: ViewSnapshot,
}

impl SessionResponse {
    fn of(session: &Session) -> Json<Self> {
        Json(Self {
            id: session.id,
            snapshot: session.view.snapshot(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BrokenImageRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenImageResponse {
    pub excluded: bool,
    pub snapshot: ViewSnapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub connector_id: String,
}

/// What the claim widget reported: a transaction hash or an error message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReport {
    #[serde(default)]
    pub transaction_hash: Option<TxHash>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ClaimReport {
    fn into_outcome(self) -> AppResult<Result<TransactionConfirmation, ClaimError>> {
        match (self.transaction_hash, self.error) {
            (Some(transaction_hash), None) => {
                Ok(Ok(TransactionConfirmation { transaction_hash }))
            }
            (None, Some(message)) => Ok(Err(ClaimError::Transaction(message))),
            _ => Err(AppError::bad_request(
                "claim report needs exactly one of transactionHash or error",
            )),
        }
    }
}

/// Requests the view queued for the page's script.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outbox {
    pub ready: bool,
    pub casts: Vec<ComposeIntent>,
    pub connect: Option<Connector>,
}

fn session(state: &AppState, id: Uuid) -> AppResult<Arc<Session>> {
    state
        .sessions()
        .get(id)
        .ok_or_else(|| AppError::not_found(format!("session {id} not found")))
}

#[instrument(skip_all)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let connection = request.wallet.unwrap_or_default();
    if connection.is_connected && connection.address.is_none() {
        return Err(AppError::bad_request(
            "connected wallet report is missing an address",
        ));
    }

    let session = state.sessions().open(SessionSeed {
        context: request.context,
        connection,
        connectors: request.connectors,
    })?;
    Ok((StatusCode::CREATED, SessionResponse::of(&session)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let session = session(&state, id)?;
    Ok(SessionResponse::of(&session))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .sessions()
        .close(id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::not_found(format!("session {id} not found")))
}

pub async fn report_broken_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<BrokenImageRequest>,
) -> AppResult<Json<BrokenImageResponse>> {
    let session = session(&state, id)?;
    let excluded = session.view.report_image_error(&request.url)?;
    Ok(Json(BrokenImageResponse {
        excluded,
        snapshot: session.view.snapshot(),
    }))
}

pub async fn report_wallet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(connection): Json<ConnectionState>,
) -> AppResult<Json<SessionResponse>> {
    if connection.is_connected && connection.address.is_none() {
        return Err(AppError::bad_request(
            "connected wallet report is missing an address",
        ));
    }

    let session = session(&state, id)?;
    session.wallet.report(connection);
    session.view.refresh_balance().await?;
    debug!(session = %id, connected = connection.is_connected, "wallet reported");
    Ok(SessionResponse::of(&session))
}

pub async fn connect(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConnectRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = session(&state, id)?;
    session.view.connect(&request.connector_id).await?;
    Ok(SessionResponse::of(&session))
}

pub async fn share(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let session = session(&state, id)?;
    session.view.share().await?;
    Ok(SessionResponse::of(&session))
}

pub async fn report_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(report): Json<ClaimReport>,
) -> AppResult<Json<SessionResponse>> {
    let outcome = report.into_outcome()?;
    let session = session(&state, id)?;
    if !session.view.claim_availability().is_ready() {
        return Err(AppError::conflict("minting is not configured"));
    }
    session.view.record_claim_outcome(outcome).await?;
    Ok(SessionResponse::of(&session))
}

pub async fn dismiss_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let session = session(&state, id)?;
    session.view.dismiss_notification()?;
    Ok(SessionResponse::of(&session))
}

pub async fn drain_outbox(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Outbox>> {
    let session = session(&state, id)?;
    Ok(Json(Outbox {
        ready: session.host.is_ready(),
        casts: session.host.drain_casts(),
        connect: session.wallet.take_pending_connect(),
    }))
}
