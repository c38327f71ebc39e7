//! Account credentials (`users` table) and the public account view.
//!
//! The profile half of an account lives in [`crate::profiles`].

use sea_orm::entity::prelude::*;

/// An account as exposed to callers. Never carries the password hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_pro: bool,
}

/// Registration input.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Full overwrite of the mutable profile fields of `id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountUpdate {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_pro: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
