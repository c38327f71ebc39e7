//! Membership authority shared by the ledger and transaction operations.

use std::collections::HashSet;

use sea_orm::{QueryFilter, prelude::*};

use crate::{EngineError, MemberRole, ResultEngine, ledger_members, ledgers};

use super::{Engine, bounded};

impl Engine {
    /// Current member identities of `ledger_id`.
    ///
    /// Fails with [`EngineError::LedgerNotFound`] when the ledger is unknown.
    pub async fn ledger_members(&self, ledger_id: &str) -> ResultEngine<HashSet<String>> {
        self.require_ledger(ledger_id).await?;
        let rows = bounded(
            ledger_members::Entity::find()
                .filter(ledger_members::Column::LedgerId.eq(ledger_id))
                .all(&self.ledgers),
        )
        .await?;
        Ok(rows.into_iter().map(|row| row.account_id).collect())
    }

    pub async fn ledger_exists(&self, ledger_id: &str) -> ResultEngine<bool> {
        let ledger = bounded(
            ledgers::Entity::find_by_id(ledger_id.to_string()).one(&self.ledgers),
        )
        .await?;
        Ok(ledger.is_some())
    }

    pub(super) async fn require_ledger(&self, ledger_id: &str) -> ResultEngine<()> {
        if self.ledger_exists(ledger_id).await? {
            Ok(())
        } else {
            tracing::warn!(ledger_id, "ledger not found");
            Err(EngineError::LedgerNotFound)
        }
    }
}

pub(super) fn require_member(
    members: &HashSet<String>,
    account_id: &str,
    role: MemberRole,
) -> ResultEngine<()> {
    if members.contains(account_id) {
        return Ok(());
    }
    tracing::warn!(account_id, ?role, "not a member of the ledger");
    Err(EngineError::NotAMember(role))
}
