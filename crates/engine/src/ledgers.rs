//! Ledgers: shared books whose members record transactions together.

use sea_orm::entity::prelude::*;

use crate::{Categories, Member, ResultEngine, validation::required_text};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ledger {
    pub id: String,
    pub name: String,
    pub notification: bool,
    pub theme: String,
    pub currency: String,
    pub categories: Categories,
    /// Members in insertion order.
    pub members: Vec<Member>,
}

/// Everything needed to open a ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerNew {
    pub name: String,
    pub notification: bool,
    pub theme: String,
    pub currency: String,
    pub categories: Categories,
    pub members: Vec<Member>,
}

/// Partial metadata update: only the present fields are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerPatch {
    pub name: Option<String>,
    pub notification: Option<bool>,
    pub theme: Option<String>,
    pub currency: Option<String>,
}

impl LedgerNew {
    pub(crate) fn normalized(self) -> ResultEngine<Self> {
        self.categories.validate()?;
        let mut members = Vec::with_capacity(self.members.len());
        for member in self.members {
            let member = member.normalized()?;
            if members
                .iter()
                .any(|m: &Member| m.account_id == member.account_id)
            {
                return Err(crate::EngineError::Validation(format!(
                    "member {} listed twice",
                    member.account_id
                )));
            }
            members.push(member);
        }
        Ok(Self {
            name: required_text(&self.name, "name")?,
            notification: self.notification,
            theme: required_text(&self.theme, "theme")?,
            currency: required_text(&self.currency, "currency")?,
            categories: self.categories,
            members,
        })
    }
}

impl LedgerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.notification.is_none()
            && self.theme.is_none()
            && self.currency.is_none()
    }

    pub(crate) fn normalized(self) -> ResultEngine<Self> {
        if self.is_empty() {
            return Err(crate::EngineError::Validation(
                "nothing to update".to_string(),
            ));
        }
        let text = |value: Option<String>, label| {
            value
                .map(|value| required_text(&value, label))
                .transpose()
        };
        Ok(Self {
            name: text(self.name, "name")?,
            notification: self.notification,
            theme: text(self.theme, "theme")?,
            currency: text(self.currency, "currency")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub notification: bool,
    pub theme: String,
    pub currency: String,
    /// JSON encoded [`Categories`].
    #[sea_orm(column_type = "Text")]
    pub categories: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub(crate) fn into_ledger(self, members: Vec<Member>) -> ResultEngine<Ledger> {
        Ok(Ledger {
            categories: Categories::from_json(&self.categories)?,
            id: self.id,
            name: self.name,
            notification: self.notification,
            theme: self.theme,
            currency: self.currency,
            members,
        })
    }
}
