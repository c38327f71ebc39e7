//! Transactions recorded in a ledger and the rules every one must satisfy.
//!
//! Amounts are integer minor units. A transaction is split among its
//! sharers, and the split must add up to the total exactly.

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, ResultEngine, Sharer, validation::required_text};

/// What a transaction does to the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Income,
    Expense,
    Transfer,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }
}

impl TryFrom<&str> for Action {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            _ => Err(EngineError::Validation(
                "type.action should be income or expense or transfer".to_string(),
            )),
        }
    }
}

/// Action plus the category the transaction is filed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionType {
    pub action: Action,
    pub parent_type: u8,
    pub child_type: u8,
}

/// A transaction that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionDraft {
    pub ledger_id: String,
    pub amount_minor: i64,
    pub record_time: u32,
    pub update_time: u32,
    pub kind: TransactionType,
    pub name: String,
    pub payer: String,
    pub sharers: Vec<Sharer>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub ledger_id: String,
    pub amount_minor: i64,
    pub record_time: u32,
    pub update_time: u32,
    pub kind: TransactionType,
    pub name: String,
    pub payer: String,
    /// Sharers in the order they were submitted.
    pub sharers: Vec<Sharer>,
}

impl TransactionDraft {
    /// Check the amount split, the name and the timestamps against `now`
    /// (see [`crate::validation::truncated_epoch`]).
    pub fn validate(&self, now: u32) -> ResultEngine<()> {
        check_entry(
            self.amount_minor,
            &self.sharers,
            &self.name,
            [self.record_time, self.update_time],
            now,
        )
    }

    pub(crate) fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            ledger_id: self.ledger_id,
            amount_minor: self.amount_minor,
            record_time: self.record_time,
            update_time: self.update_time,
            kind: self.kind,
            name: self.name.trim().to_string(),
            payer: self.payer,
            sharers: self.sharers,
        }
    }
}

impl Transaction {
    pub fn validate(&self, now: u32) -> ResultEngine<()> {
        check_entry(
            self.amount_minor,
            &self.sharers,
            &self.name,
            [self.record_time, self.update_time],
            now,
        )
    }
}

fn check_entry(
    amount_minor: i64,
    sharers: &[Sharer],
    name: &str,
    times: [u32; 2],
    now: u32,
) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::Validation(
            "amount should be positive".to_string(),
        ));
    }

    let mut total: i64 = 0;
    for sharer in sharers {
        if sharer.amount_minor <= 0 {
            return Err(EngineError::Validation(
                "amount should be positive".to_string(),
            ));
        }
        total = total.checked_add(sharer.amount_minor).ok_or_else(|| {
            EngineError::Validation("sum of sharers' amount overflows".to_string())
        })?;
    }
    if total != amount_minor {
        return Err(EngineError::Validation(
            "amount should be equal to the sum of sharers' amount".to_string(),
        ));
    }

    required_text(name, "name")?;

    if times.iter().any(|&time| time > now) {
        return Err(EngineError::Validation(
            "record and update time should be in the past".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub ledger_id: String,
    pub amount_minor: i64,
    pub record_time: i64,
    pub update_time: i64,
    pub action: String,
    pub parent_type: i32,
    pub child_type: i32,
    pub name: String,
    pub payer: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        ActiveModel {
            id: ActiveValue::Set(tx.id.clone()),
            ledger_id: ActiveValue::Set(tx.ledger_id.clone()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            record_time: ActiveValue::Set(i64::from(tx.record_time)),
            update_time: ActiveValue::Set(i64::from(tx.update_time)),
            action: ActiveValue::Set(tx.kind.action.as_str().to_string()),
            parent_type: ActiveValue::Set(i32::from(tx.kind.parent_type)),
            child_type: ActiveValue::Set(i32::from(tx.kind.child_type)),
            name: ActiveValue::Set(tx.name.clone()),
            payer: ActiveValue::Set(tx.payer.clone()),
        }
    }
}

impl Model {
    pub(crate) fn into_transaction(self, sharers: Vec<Sharer>) -> ResultEngine<Transaction> {
        let corrupt = |field: &str| {
            EngineError::Internal(format!("transaction {} has invalid {field}", self.id))
        };
        let kind = TransactionType {
            action: Action::try_from(self.action.as_str()).map_err(|_| corrupt("action"))?,
            parent_type: u8::try_from(self.parent_type).map_err(|_| corrupt("parent type"))?,
            child_type: u8::try_from(self.child_type).map_err(|_| corrupt("child type"))?,
        };
        let record_time = u32::try_from(self.record_time).map_err(|_| corrupt("record time"))?;
        let update_time = u32::try_from(self.update_time).map_err(|_| corrupt("update time"))?;
        Ok(Transaction {
            id: self.id,
            ledger_id: self.ledger_id,
            amount_minor: self.amount_minor,
            record_time,
            update_time,
            kind,
            name: self.name,
            payer: self.payer,
            sharers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(amount_minor: i64, shares: &[i64]) -> TransactionDraft {
        TransactionDraft {
            ledger_id: "ledger".to_string(),
            amount_minor,
            record_time: 100,
            update_time: 100,
            kind: TransactionType {
                action: Action::Expense,
                parent_type: 1,
                child_type: 2,
            },
            name: "dinner".to_string(),
            payer: "a".to_string(),
            sharers: shares
                .iter()
                .enumerate()
                .map(|(i, &amount_minor)| Sharer {
                    account_id: format!("member-{i}"),
                    amount_minor,
                })
                .collect(),
        }
    }

    fn message(result: ResultEngine<()>) -> String {
        match result {
            Err(EngineError::Validation(message)) => message,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn exact_split_passes() {
        assert!(draft(100, &[60, 40]).validate(200).is_ok());
    }

    #[test]
    fn off_by_one_split_is_rejected() {
        assert_eq!(
            message(draft(100, &[60, 39]).validate(200)),
            "amount should be equal to the sum of sharers' amount"
        );
    }

    #[test]
    fn amounts_must_be_positive() {
        assert_eq!(
            message(draft(0, &[]).validate(200)),
            "amount should be positive"
        );
        assert_eq!(
            message(draft(100, &[100, 0]).validate(200)),
            "amount should be positive"
        );
    }

    #[test]
    fn overflowing_split_is_rejected() {
        assert_eq!(
            message(draft(i64::MAX, &[i64::MAX, 1]).validate(200)),
            "sum of sharers' amount overflows"
        );
    }

    #[test]
    fn future_times_are_rejected() {
        let mut future = draft(10, &[10]);
        future.update_time = 201;
        assert_eq!(
            message(future.validate(200)),
            "record and update time should be in the past"
        );
        assert!(draft(10, &[10]).validate(100).is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut blank = draft(10, &[10]);
        blank.name = "  ".to_string();
        assert_eq!(message(blank.validate(200)), "name must not be empty");
    }

    #[test]
    fn action_parsing() {
        assert_eq!(Action::try_from("transfer").unwrap(), Action::Transfer);
        assert_eq!(
            Action::try_from("gift"),
            Err(EngineError::Validation(
                "type.action should be income or expense or transfer".to_string()
            ))
        );
    }
}
