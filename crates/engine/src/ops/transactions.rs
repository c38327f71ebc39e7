use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, Order, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, MemberRole, ResultEngine, Sharer, Transaction, TransactionDraft, sharers,
    transactions, validation::truncated_epoch,
};

use super::{Engine, access::require_member, bounded, with_tx};

impl Engine {
    /// Record a new transaction on behalf of `acting`. Returns its id.
    ///
    /// The caller, the payer and every sharer must be members of the ledger.
    pub async fn create_transaction(
        &self,
        draft: TransactionDraft,
        acting: &str,
    ) -> ResultEngine<String> {
        draft.validate(truncated_epoch(Utc::now()))?;
        self.require_participants(
            &draft.ledger_id,
            acting,
            &draft.payer,
            &draft.sharers,
        )
        .await?;

        let tx = draft.into_transaction(Uuid::new_v4().to_string());
        bounded(self.insert_transaction(&tx)).await?;
        tracing::info!(
            ledger_id = %tx.ledger_id,
            transaction_id = %tx.id,
            amount_minor = tx.amount_minor,
            "created transaction"
        );
        Ok(tx.id)
    }

    async fn insert_transaction(&self, tx: &Transaction) -> ResultEngine<()> {
        with_tx!(self.ledgers, |db_tx| {
            transactions::ActiveModel::from(tx).insert(&db_tx).await?;
            insert_sharers(&db_tx, &tx.id, &tx.sharers).await?;
            Ok(())
        })
    }

    pub async fn transaction(
        &self,
        ledger_id: &str,
        transaction_id: &str,
        acting: &str,
    ) -> ResultEngine<Transaction> {
        let members = self.ledger_members(ledger_id).await?;
        require_member(&members, acting, MemberRole::Caller)?;
        bounded(self.load_transaction(ledger_id, transaction_id)).await
    }

    async fn load_transaction(
        &self,
        ledger_id: &str,
        transaction_id: &str,
    ) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .filter(transactions::Column::LedgerId.eq(ledger_id))
            .one(&self.ledgers)
            .await?
            .ok_or(EngineError::TransactionNotFound)?;
        let sharers = sharers::Entity::find()
            .filter(sharers::Column::TransactionId.eq(transaction_id))
            .order_by_asc(sharers::Column::Id)
            .all(&self.ledgers)
            .await?
            .into_iter()
            .map(Sharer::from)
            .collect();
        model.into_transaction(sharers)
    }

    /// Transactions whose record time lies in `start..=end`, oldest first.
    pub async fn transactions_by_time(
        &self,
        ledger_id: &str,
        start: u32,
        end: u32,
        acting: &str,
    ) -> ResultEngine<Vec<Transaction>> {
        let members = self.ledger_members(ledger_id).await?;
        require_member(&members, acting, MemberRole::Caller)?;
        bounded(self.load_transactions_between(ledger_id, start, end)).await
    }

    async fn load_transactions_between(
        &self,
        ledger_id: &str,
        start: u32,
        end: u32,
    ) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::LedgerId.eq(ledger_id))
            .filter(transactions::Column::RecordTime.between(i64::from(start), i64::from(end)))
            .order_by_asc(transactions::Column::RecordTime)
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.ledgers)
            .await?;
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = models.iter().map(|model| model.id.clone()).collect();
        let mut split: HashMap<String, Vec<Sharer>> = HashMap::new();
        for row in sharers::Entity::find()
            .filter(sharers::Column::TransactionId.is_in(ids))
            .order_by_asc(sharers::Column::Id)
            .all(&self.ledgers)
            .await?
        {
            split
                .entry(row.transaction_id.clone())
                .or_default()
                .push(row.into());
        }

        models
            .into_iter()
            .map(|model| {
                let sharers = split.remove(&model.id).unwrap_or_default();
                model.into_transaction(sharers)
            })
            .collect()
    }

    /// Overwrite a stored transaction with `tx`.
    ///
    /// Membership is checked again against the ledger `tx` points to, for
    /// the caller and for the new payer and sharers.
    pub async fn update_transaction(&self, acting: &str, tx: Transaction) -> ResultEngine<()> {
        tx.validate(truncated_epoch(Utc::now()))?;
        self.require_participants(&tx.ledger_id, acting, &tx.payer, &tx.sharers)
            .await?;

        let tx = Transaction {
            name: tx.name.trim().to_string(),
            ..tx
        };
        bounded(self.overwrite_transaction(&tx)).await?;
        tracing::info!(
            ledger_id = %tx.ledger_id,
            transaction_id = %tx.id,
            "updated transaction"
        );
        Ok(())
    }

    async fn overwrite_transaction(&self, tx: &Transaction) -> ResultEngine<()> {
        let mut changes = transactions::ActiveModel::from(tx);
        changes.id = ActiveValue::NotSet;
        changes.ledger_id = ActiveValue::NotSet;
        with_tx!(self.ledgers, |db_tx| {
            let result = transactions::Entity::update_many()
                .set(changes)
                .filter(transactions::Column::Id.eq(tx.id.as_str()))
                .filter(transactions::Column::LedgerId.eq(tx.ledger_id.as_str()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                tracing::warn!(transaction_id = %tx.id, "update of unknown transaction");
                return Err(EngineError::TransactionNotFound);
            }
            sharers::Entity::delete_many()
                .filter(sharers::Column::TransactionId.eq(tx.id.as_str()))
                .exec(&db_tx)
                .await?;
            insert_sharers(&db_tx, &tx.id, &tx.sharers).await?;
            Ok(())
        })
    }

    pub async fn delete_transaction(
        &self,
        ledger_id: &str,
        transaction_id: &str,
        acting: &str,
    ) -> ResultEngine<()> {
        let members = self.ledger_members(ledger_id).await?;
        require_member(&members, acting, MemberRole::Caller)?;
        bounded(self.remove_transaction(ledger_id, transaction_id)).await?;
        tracing::info!(ledger_id, transaction_id, "deleted transaction");
        Ok(())
    }

    async fn remove_transaction(&self, ledger_id: &str, transaction_id: &str) -> ResultEngine<()> {
        with_tx!(self.ledgers, |db_tx| {
            let owned = transactions::Entity::find_by_id(transaction_id.to_string())
                .filter(transactions::Column::LedgerId.eq(ledger_id))
                .one(&db_tx)
                .await?;
            if owned.is_none() {
                tracing::warn!(ledger_id, transaction_id, "delete of unknown transaction");
                return Err(EngineError::TransactionNotFound);
            }
            sharers::Entity::delete_many()
                .filter(sharers::Column::TransactionId.eq(transaction_id))
                .exec(&db_tx)
                .await?;
            let result = transactions::Entity::delete_many()
                .filter(transactions::Column::Id.eq(transaction_id))
                .filter(transactions::Column::LedgerId.eq(ledger_id))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::TransactionNotFound);
            }
            Ok(())
        })
    }

    async fn require_participants(
        &self,
        ledger_id: &str,
        acting: &str,
        payer: &str,
        sharers: &[Sharer],
    ) -> ResultEngine<()> {
        let members = self.ledger_members(ledger_id).await?;
        require_member(&members, acting, MemberRole::Caller)?;
        require_member(&members, payer, MemberRole::Payer)?;
        for sharer in sharers {
            require_member(&members, &sharer.account_id, MemberRole::Sharer)?;
        }
        Ok(())
    }
}

async fn insert_sharers(
    db_tx: &DatabaseTransaction,
    transaction_id: &str,
    split: &[Sharer],
) -> ResultEngine<()> {
    for sharer in split {
        sharers::ActiveModel {
            transaction_id: ActiveValue::Set(transaction_id.to_string()),
            account_id: ActiveValue::Set(sharer.account_id.clone()),
            amount_minor: ActiveValue::Set(sharer.amount_minor),
            ..Default::default()
        }
        .insert(db_tx)
        .await?;
    }
    Ok(())
}
