use axum::{
    Router,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post, put},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use std::sync::Arc;

use crate::{ServerError, ledgers, members, token::AuthError, transactions, user, validator};
use engine::Engine;

use crate::TokenService;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: Arc<TokenService>,
}

/// Verify the bearer token and attach the [`crate::AuthUser`] to the request.
async fn auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if !request.headers().contains_key(AUTHORIZATION) {
        tracing::warn!(path = %request.uri().path(), "request without credentials");
        return Err(AuthError::MissingHeader.into());
    }
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AuthError::Malformed)?;

    let user = match state.tokens.verify(bearer.token()) {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!(path = %request.uri().path(), "rejected token: {err}");
            return Err(err.into());
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/user", post(user::register))
        .route("/user/login", post(user::login));

    let scoped = Router::new()
        .route("/user/{account_id}", get(user::get))
        .route("/ledger/{ledger_id}/", patch(ledgers::update))
        .route(
            "/ledger/{ledger_id}/member",
            post(members::add)
                .patch(members::update_nickname)
                .delete(members::remove),
        )
        .route("/ledger/{ledger_id}/transaction", post(transactions::create))
        .route(
            "/ledger/{ledger_id}/transaction/time",
            get(transactions::by_time),
        )
        .route(
            "/ledger/{ledger_id}/transaction/{transaction_id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route_layer(middleware::from_fn(validator::validate_path_ids));

    let protected = Router::new()
        .route("/user/", put(user::update))
        .route("/ledger", get(ledgers::list).post(ledgers::create))
        .merge(scoped)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    tokens: TokenService,
    listener: tokio::net::TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        tokens: Arc::new(tokens),
    };

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
