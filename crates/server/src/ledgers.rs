//! Ledger creation, listing and metadata endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use api_types::ledger::{
    ChildType, Ledger, LedgerCreated, LedgerNew, LedgerUpdate, Member, ParentType, Types,
};
use engine::{Categories, ChildCategory, LedgerPatch, ParentCategory};

use crate::{AuthUser, Reply, ServerError, reply, reply_empty, server::ServerState};

fn categories_from_wire(types: Types) -> Categories {
    Categories {
        parents: types
            .parent_types
            .into_iter()
            .map(|parent| ParentCategory {
                id: parent.ptid,
                name: parent.name,
                children: parent
                    .child_types
                    .into_iter()
                    .map(|child| ChildCategory {
                        id: child.ctid,
                        name: child.name,
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn categories_to_wire(categories: Categories) -> Types {
    Types {
        parent_types: categories
            .parents
            .into_iter()
            .map(|parent| ParentType {
                ptid: parent.id,
                name: parent.name,
                child_types: parent
                    .children
                    .into_iter()
                    .map(|child| ChildType {
                        ctid: child.id,
                        name: child.name,
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<LedgerNew>, ServerError>,
) -> Result<Reply<LedgerCreated>, ServerError> {
    let ulid = state
        .engine
        .new_ledger(engine::LedgerNew {
            name: payload.name,
            notification: payload.notification,
            theme: payload.theme,
            currency: payload.currency,
            categories: categories_from_wire(payload.types),
            members: payload
                .members
                .into_iter()
                .map(|member| engine::Member::new(member.uuid, member.nickname))
                .collect(),
        })
        .await?;
    tracing::debug!(account_id = %user.id, ledger_id = %ulid, "ledger created by request");
    Ok(reply(StatusCode::CREATED, LedgerCreated { ulid }))
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Reply<Vec<Ledger>>, ServerError> {
    let ledgers = state
        .engine
        .ledgers_for_account(&user.id)
        .await?
        .into_iter()
        .map(|ledger| Ledger {
            ulid: ledger.id,
            name: ledger.name,
            notification: ledger.notification,
            theme: ledger.theme,
            currency: ledger.currency,
            types: categories_to_wire(ledger.categories),
            members: ledger
                .members
                .into_iter()
                .map(|member| Member {
                    uuid: member.account_id,
                    nickname: member.nickname,
                })
                .collect(),
        })
        .collect();
    Ok(reply(StatusCode::OK, ledgers))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(ledger_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<LedgerUpdate>, ServerError>,
) -> Result<Reply<()>, ServerError> {
    state
        .engine
        .update_ledger(
            &ledger_id,
            LedgerPatch {
                name: payload.name,
                notification: payload.notification,
                theme: payload.theme,
                currency: payload.currency,
            },
        )
        .await?;
    Ok(reply_empty(StatusCode::OK))
}
