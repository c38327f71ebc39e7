//! Registration, login and profile endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use api_types::user::{LoggedIn, Login, Profile, Register, Registered};
use engine::{AccountUpdate, NewAccount};

use crate::{AuthUser, Reply, ServerError, reply, reply_empty, server::ServerState};

pub async fn register(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<Register>, ServerError>,
) -> Result<Reply<Registered>, ServerError> {
    let email = payload.email.trim().to_string();
    let uuid = state
        .engine
        .register(NewAccount {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;
    Ok(reply(StatusCode::CREATED, Registered { uuid, email }))
}

pub async fn login(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<Login>, ServerError>,
) -> Result<Reply<LoggedIn>, ServerError> {
    let uuid = state
        .engine
        .authenticate(&payload.email, &payload.password)
        .await?;
    let token = state.tokens.issue(&uuid, payload.email.trim())?;
    tracing::info!(account_id = %uuid, "issued token");
    Ok(reply(StatusCode::OK, LoggedIn { uuid, token }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(account_id): Path<String>,
) -> Result<Reply<Profile>, ServerError> {
    let account = state.engine.account(&account_id).await?;
    Ok(reply(
        StatusCode::OK,
        Profile {
            uuid: account.id,
            username: account.username,
            email: account.email,
            is_pro: account.is_pro,
        },
    ))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<Profile>, ServerError>,
) -> Result<Reply<()>, ServerError> {
    state
        .engine
        .update_account(
            &user.id,
            AccountUpdate {
                id: payload.uuid,
                username: payload.username,
                email: payload.email,
                is_pro: payload.is_pro,
            },
        )
        .await?;
    Ok(reply_empty(StatusCode::OK))
}
