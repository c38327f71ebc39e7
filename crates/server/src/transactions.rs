use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use api_types::transaction::{
    Sharer, TimeRange, Transaction, TransactionBody, TransactionCreated, TransactionType,
};
use engine::Action;

use crate::{AuthUser, Reply, ServerError, reply, reply_empty, server::ServerState};

fn kind_from_wire(kind: &TransactionType) -> Result<engine::TransactionType, ServerError> {
    Ok(engine::TransactionType {
        action: Action::try_from(kind.action.as_str())?,
        parent_type: kind.parent_type,
        child_type: kind.child_type,
    })
}

fn sharers_from_wire(sharers: Vec<Sharer>) -> Vec<engine::Sharer> {
    sharers
        .into_iter()
        .map(|sharer| engine::Sharer {
            account_id: sharer.uuid,
            amount_minor: sharer.amount,
        })
        .collect()
}

fn to_wire(tx: engine::Transaction) -> Transaction {
    Transaction {
        utid: tx.id,
        ulid: tx.ledger_id,
        amount: tx.amount_minor,
        record_time: tx.record_time,
        update_time: tx.update_time,
        kind: TransactionType {
            action: tx.kind.action.as_str().to_string(),
            parent_type: tx.kind.parent_type,
            child_type: tx.kind.child_type,
        },
        name: tx.name,
        payer: tx.payer,
        sharers: tx
            .sharers
            .into_iter()
            .map(|sharer| Sharer {
                uuid: sharer.account_id,
                amount: sharer.amount_minor,
            })
            .collect(),
    }
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(ledger_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionBody>, ServerError>,
) -> Result<Reply<TransactionCreated>, ServerError> {
    let draft = engine::TransactionDraft {
        ledger_id,
        amount_minor: payload.amount,
        record_time: payload.record_time,
        update_time: payload.update_time,
        kind: kind_from_wire(&payload.kind)?,
        name: payload.name,
        payer: payload.payer,
        sharers: sharers_from_wire(payload.sharers),
    };
    let utid = state.engine.create_transaction(draft, &user.id).await?;
    Ok(reply(StatusCode::CREATED, TransactionCreated { utid }))
}

pub async fn get(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path((ledger_id, transaction_id)): Path<(String, String)>,
) -> Result<Reply<Transaction>, ServerError> {
    let tx = state
        .engine
        .transaction(&ledger_id, &transaction_id, &user.id)
        .await?;
    Ok(reply(StatusCode::OK, to_wire(tx)))
}

pub async fn by_time(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(ledger_id): Path<String>,
    WithRejection(Query(range), _): WithRejection<Query<TimeRange>, ServerError>,
) -> Result<Reply<Vec<Transaction>>, ServerError> {
    if range.start_time > range.end_time {
        return Err(ServerError::Invalid(
            "start time should not be after end time".to_string(),
        ));
    }
    let found = state
        .engine
        .transactions_by_time(&ledger_id, range.start_time, range.end_time, &user.id)
        .await?
        .into_iter()
        .map(to_wire)
        .collect();
    Ok(reply(StatusCode::OK, found))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path((ledger_id, transaction_id)): Path<(String, String)>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionBody>, ServerError>,
) -> Result<Reply<()>, ServerError> {
    let tx = engine::Transaction {
        id: transaction_id,
        ledger_id,
        amount_minor: payload.amount,
        record_time: payload.record_time,
        update_time: payload.update_time,
        kind: kind_from_wire(&payload.kind)?,
        name: payload.name,
        payer: payload.payer,
        sharers: sharers_from_wire(payload.sharers),
    };
    state.engine.update_transaction(&user.id, tx).await?;
    Ok(reply_empty(StatusCode::OK))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path((ledger_id, transaction_id)): Path<(String, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(&ledger_id, &transaction_id, &user.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
