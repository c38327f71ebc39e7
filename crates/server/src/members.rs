//! Ledger membership endpoints.
//!
//! Adding names the new member in the body; nickname changes and removal
//! apply to the caller.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use api_types::ledger::{Member, NicknameUpdate};

use crate::{AuthUser, Reply, ServerError, reply_empty, server::ServerState};

pub async fn add(
    State(state): State<ServerState>,
    Path(ledger_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<Member>, ServerError>,
) -> Result<Reply<()>, ServerError> {
    state
        .engine
        .add_member(&ledger_id, engine::Member::new(payload.uuid, payload.nickname))
        .await?;
    Ok(reply_empty(StatusCode::OK))
}

pub async fn update_nickname(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(ledger_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<NicknameUpdate>, ServerError>,
) -> Result<Reply<()>, ServerError> {
    state
        .engine
        .update_nickname(&ledger_id, &user.id, &payload.nickname)
        .await?;
    Ok(reply_empty(StatusCode::OK))
}

pub async fn remove(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(ledger_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_member(&ledger_id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
