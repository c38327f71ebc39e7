//! Per-member split of a transaction (`transaction_sharers` table).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sharer {
    pub account_id: String,
    pub amount_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transaction_sharers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub transaction_id: String,
    pub account_id: String,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Sharer {
    fn from(model: Model) -> Self {
        Self {
            account_id: model.account_id,
            amount_minor: model.amount_minor,
        }
    }
}
