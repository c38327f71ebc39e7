use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use api_types::{Envelope, ErrorCode};
pub use server::{ServerState, router, run_with_listener};
pub use token::{AuthError, AuthUser, TokenService};

mod ledgers;
mod members;
mod server;
mod token;
mod transactions;
mod user;
mod validator;

pub enum ServerError {
    Engine(EngineError),
    Auth(AuthError),
    Invalid(String),
}

/// Successful response: status code plus the enveloped payload.
type Reply<T> = (StatusCode, Json<Envelope<T>>);

fn reply<T>(status: StatusCode, data: T) -> Reply<T> {
    (status, Json(Envelope::success(data)))
}

fn reply_empty(status: StatusCode) -> Reply<()> {
    (status, Json(Envelope::empty()))
}

fn status_for_engine_error(err: &EngineError) -> (StatusCode, ErrorCode) {
    match err {
        EngineError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::Validation),
        EngineError::NotAMember(_) | EngineError::MemberNotFound => {
            (StatusCode::BAD_REQUEST, ErrorCode::NotAMember)
        }
        EngineError::LedgerNotFound
        | EngineError::TransactionNotFound
        | EngineError::AccountNotFound => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        EngineError::AlreadyMember | EngineError::EmailTaken => {
            (StatusCode::CONFLICT, ErrorCode::Conflict)
        }
        EngineError::IncorrectPassword | EngineError::Unauthorized(_) => {
            (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized)
        }
        EngineError::Database(_) | EngineError::Internal(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Internal)
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Internal(reason) => {
            tracing::error!("internal error: {reason}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

fn status_for_auth_error(err: &AuthError) -> (StatusCode, ErrorCode) {
    match err {
        AuthError::Issue(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Internal),
        _ => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let ((status, code), message) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Auth(err) => {
                let outcome = status_for_auth_error(&err);
                let message = match err {
                    AuthError::Issue(reason) => {
                        tracing::error!("failed to issue token: {reason}");
                        "internal server error".to_string()
                    }
                    other => other.to_string(),
                };
                (outcome, message)
            }
            ServerError::Invalid(message) => ((StatusCode::BAD_REQUEST, ErrorCode::Validation), message),
        };

        (status, Json(Envelope::<()>::failure(message, code))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        tracing::warn!("rejected request body: {value}");
        Self::Invalid(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        tracing::warn!("rejected query string: {value}");
        Self::Invalid(value.body_text())
    }
}
