use std::collections::HashMap;

use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, Ledger, LedgerNew, LedgerPatch, Member, ResultEngine, ledger_members, ledgers,
    validation::required_text,
};

use super::{Engine, bounded, with_tx};

impl Engine {
    /// Open a ledger with its initial members. Returns the new ledger id.
    pub async fn new_ledger(&self, ledger: LedgerNew) -> ResultEngine<String> {
        let ledger = ledger.normalized()?;
        let ledger_id = Uuid::new_v4().to_string();
        bounded(self.insert_ledger(&ledger_id, &ledger)).await?;
        tracing::info!(
            ledger_id = %ledger_id,
            members = ledger.members.len(),
            "created ledger"
        );
        Ok(ledger_id)
    }

    async fn insert_ledger(&self, ledger_id: &str, ledger: &LedgerNew) -> ResultEngine<()> {
        let categories = ledger.categories.to_json()?;
        with_tx!(self.ledgers, |db_tx| {
            ledgers::ActiveModel {
                id: ActiveValue::Set(ledger_id.to_string()),
                name: ActiveValue::Set(ledger.name.clone()),
                notification: ActiveValue::Set(ledger.notification),
                theme: ActiveValue::Set(ledger.theme.clone()),
                currency: ActiveValue::Set(ledger.currency.clone()),
                categories: ActiveValue::Set(categories),
            }
            .insert(&db_tx)
            .await?;
            for member in &ledger.members {
                ledger_members::ActiveModel {
                    ledger_id: ActiveValue::Set(ledger_id.to_string()),
                    account_id: ActiveValue::Set(member.account_id.clone()),
                    nickname: ActiveValue::Set(member.nickname.clone()),
                    ..Default::default()
                }
                .insert(&db_tx)
                .await?;
            }
            Ok(())
        })
    }

    /// Every ledger `account_id` belongs to, in the order it joined them.
    pub async fn ledgers_for_account(&self, account_id: &str) -> ResultEngine<Vec<Ledger>> {
        bounded(self.load_ledgers_for(account_id)).await
    }

    async fn load_ledgers_for(&self, account_id: &str) -> ResultEngine<Vec<Ledger>> {
        let ledger_ids: Vec<String> = ledger_members::Entity::find()
            .filter(ledger_members::Column::AccountId.eq(account_id))
            .order_by_asc(ledger_members::Column::Id)
            .all(&self.ledgers)
            .await?
            .into_iter()
            .map(|row| row.ledger_id)
            .collect();
        if ledger_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut models: HashMap<String, ledgers::Model> = ledgers::Entity::find()
            .filter(ledgers::Column::Id.is_in(ledger_ids.clone()))
            .all(&self.ledgers)
            .await?
            .into_iter()
            .map(|model| (model.id.clone(), model))
            .collect();

        let mut members: HashMap<String, Vec<Member>> = HashMap::new();
        for row in ledger_members::Entity::find()
            .filter(ledger_members::Column::LedgerId.is_in(ledger_ids.clone()))
            .order_by_asc(ledger_members::Column::Id)
            .all(&self.ledgers)
            .await?
        {
            members
                .entry(row.ledger_id.clone())
                .or_default()
                .push(row.into());
        }

        ledger_ids
            .into_iter()
            .filter_map(|id| models.remove(&id))
            .map(|model| {
                let roster = members.remove(&model.id).unwrap_or_default();
                model.into_ledger(roster)
            })
            .collect()
    }

    /// Apply the present fields of `patch` to the ledger metadata.
    pub async fn update_ledger(&self, ledger_id: &str, patch: LedgerPatch) -> ResultEngine<()> {
        let patch = patch.normalized()?;
        let changes = ledgers::ActiveModel {
            name: patch.name.map_or(ActiveValue::NotSet, ActiveValue::Set),
            notification: patch.notification.map_or(ActiveValue::NotSet, ActiveValue::Set),
            theme: patch.theme.map_or(ActiveValue::NotSet, ActiveValue::Set),
            currency: patch.currency.map_or(ActiveValue::NotSet, ActiveValue::Set),
            ..Default::default()
        };
        let result = bounded(
            ledgers::Entity::update_many()
                .set(changes)
                .filter(ledgers::Column::Id.eq(ledger_id))
                .exec(&self.ledgers),
        )
        .await?;
        if result.rows_affected == 0 {
            tracing::warn!(ledger_id, "update on unknown ledger");
            return Err(EngineError::LedgerNotFound);
        }
        tracing::info!(ledger_id, "updated ledger");
        Ok(())
    }

    /// Add `member` to the ledger. An account joins a ledger at most once.
    pub async fn add_member(&self, ledger_id: &str, member: Member) -> ResultEngine<()> {
        let member = member.normalized()?;
        self.require_ledger(ledger_id).await?;

        let row = ledger_members::ActiveModel {
            ledger_id: ActiveValue::Set(ledger_id.to_string()),
            account_id: ActiveValue::Set(member.account_id.clone()),
            nickname: ActiveValue::Set(member.nickname),
            ..Default::default()
        };
        match bounded(row.insert(&self.ledgers)).await {
            Ok(_) => {
                tracing::info!(ledger_id, account_id = %member.account_id, "added member");
                Ok(())
            }
            Err(err) if err.is_unique_violation() => {
                tracing::warn!(ledger_id, account_id = %member.account_id, "already a member");
                Err(EngineError::AlreadyMember)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn remove_member(&self, ledger_id: &str, account_id: &str) -> ResultEngine<()> {
        self.require_ledger(ledger_id).await?;
        let result = bounded(
            ledger_members::Entity::delete_many()
                .filter(ledger_members::Column::LedgerId.eq(ledger_id))
                .filter(ledger_members::Column::AccountId.eq(account_id))
                .exec(&self.ledgers),
        )
        .await?;
        if result.rows_affected == 0 {
            tracing::warn!(ledger_id, account_id, "remove of a non-member");
            return Err(EngineError::MemberNotFound);
        }
        tracing::info!(ledger_id, account_id, "removed member");
        Ok(())
    }

    /// Change the nickname `account_id` uses inside the ledger.
    pub async fn update_nickname(
        &self,
        ledger_id: &str,
        account_id: &str,
        nickname: &str,
    ) -> ResultEngine<()> {
        let nickname = required_text(nickname, "nickname")?;
        self.require_ledger(ledger_id).await?;
        let result = bounded(
            ledger_members::Entity::update_many()
                .col_expr(ledger_members::Column::Nickname, Expr::value(nickname))
                .filter(ledger_members::Column::LedgerId.eq(ledger_id))
                .filter(ledger_members::Column::AccountId.eq(account_id))
                .exec(&self.ledgers),
        )
        .await?;
        if result.rows_affected == 0 {
            tracing::warn!(ledger_id, account_id, "nickname update for a non-member");
            return Err(EngineError::MemberNotFound);
        }
        tracing::info!(ledger_id, account_id, "updated nickname");
        Ok(())
    }
}
