//! Ledger membership rows.
//!
//! Row ids grow with insertion, so ordering by `id` yields members in the
//! order they joined.

use sea_orm::entity::prelude::*;

use crate::{ResultEngine, validation::required_text};

/// An account inside a ledger, with the nickname it uses there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub account_id: String,
    pub nickname: String,
}

impl Member {
    pub fn new(account_id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            nickname: nickname.into(),
        }
    }

    pub(crate) fn normalized(self) -> ResultEngine<Self> {
        Ok(Self {
            account_id: required_text(&self.account_id, "member id")?,
            nickname: required_text(&self.nickname, "nickname")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub ledger_id: String,
    pub account_id: String,
    pub nickname: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Member {
    fn from(model: Model) -> Self {
        Self {
            account_id: model.account_id,
            nickname: model.nickname,
        }
    }
}
