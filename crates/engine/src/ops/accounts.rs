use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Account, AccountUpdate, EngineError, NewAccount, ResultEngine, accounts, password, profiles,
    validation::{self, required_text},
};

use super::{Engine, bounded, with_tx};

impl Engine {
    /// Create an account and return its id.
    pub async fn register(&self, account: NewAccount) -> ResultEngine<String> {
        let username = required_text(&account.username, "username")?;
        let email = validation::email(&account.email)?;
        if account.password.is_empty() {
            return Err(EngineError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        if self.email_owner(&email).await?.is_some() {
            tracing::warn!(%email, "registration with a taken email");
            return Err(EngineError::EmailTaken);
        }

        let hashed = password::hash(account.password, self.password_cost).await?;
        let account_id = Uuid::new_v4().to_string();
        match bounded(self.insert_account(&account_id, &email, hashed, username)).await {
            Ok(()) => {
                tracing::info!(account_id = %account_id, "registered account");
                Ok(account_id)
            }
            Err(err) if err.is_unique_violation() => Err(EngineError::EmailTaken),
            Err(err) => Err(err),
        }
    }

    async fn insert_account(
        &self,
        account_id: &str,
        email: &str,
        hashed: String,
        username: String,
    ) -> ResultEngine<()> {
        with_tx!(self.accounts, |db_tx| {
            accounts::ActiveModel {
                id: ActiveValue::Set(account_id.to_string()),
                email: ActiveValue::Set(email.to_string()),
                password: ActiveValue::Set(hashed),
            }
            .insert(&db_tx)
            .await?;
            profiles::ActiveModel {
                user_id: ActiveValue::Set(account_id.to_string()),
                username: ActiveValue::Set(username),
                is_pro: ActiveValue::Set(false),
            }
            .insert(&db_tx)
            .await?;
            Ok(())
        })
    }

    /// Check credentials and return the account id they belong to.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<String> {
        let credentials = bounded(
            accounts::Entity::find()
                .filter(accounts::Column::Email.eq(email.trim()))
                .one(&self.accounts),
        )
        .await?
        .ok_or(EngineError::AccountNotFound)?;

        if !password::verify(password.to_string(), credentials.password).await? {
            tracing::warn!(account_id = %credentials.id, "wrong password");
            return Err(EngineError::IncorrectPassword);
        }
        Ok(credentials.id)
    }

    pub async fn account(&self, account_id: &str) -> ResultEngine<Account> {
        let profile = bounded(
            profiles::Entity::find_by_id(account_id.to_string()).one(&self.accounts),
        )
        .await?
        .ok_or(EngineError::AccountNotFound)?;
        let credentials = bounded(
            accounts::Entity::find_by_id(account_id.to_string()).one(&self.accounts),
        )
        .await?
        .ok_or_else(|| {
            EngineError::Internal(format!("account {account_id} has a profile but no credentials"))
        })?;
        Ok(Account {
            id: credentials.id,
            username: profile.username,
            email: credentials.email,
            is_pro: profile.is_pro,
        })
    }

    /// Overwrite the profile of `update.id`. Only the owner may do it.
    pub async fn update_account(&self, acting: &str, update: AccountUpdate) -> ResultEngine<()> {
        if update.id != acting {
            tracing::warn!(acting, target = %update.id, "profile update on another account");
            return Err(EngineError::Unauthorized(
                "Can not update other user's info".to_string(),
            ));
        }
        let username = required_text(&update.username, "username")?;
        let email = validation::email(&update.email)?;
        if let Some(owner) = self.email_owner(&email).await?
            && owner != update.id
        {
            return Err(EngineError::EmailTaken);
        }

        match bounded(self.overwrite_account(&update.id, username, email, update.is_pro)).await {
            Ok(()) => {
                tracing::info!(account_id = %update.id, "updated account");
                Ok(())
            }
            Err(err) if err.is_unique_violation() => Err(EngineError::EmailTaken),
            Err(err) => Err(err),
        }
    }

    async fn overwrite_account(
        &self,
        account_id: &str,
        username: String,
        email: String,
        is_pro: bool,
    ) -> ResultEngine<()> {
        with_tx!(self.accounts, |db_tx| {
            let result = profiles::Entity::update_many()
                .set(profiles::ActiveModel {
                    username: ActiveValue::Set(username),
                    is_pro: ActiveValue::Set(is_pro),
                    ..Default::default()
                })
                .filter(profiles::Column::UserId.eq(account_id))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::AccountNotFound);
            }
            accounts::Entity::update_many()
                .set(accounts::ActiveModel {
                    email: ActiveValue::Set(email),
                    ..Default::default()
                })
                .filter(accounts::Column::Id.eq(account_id))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn email_owner(&self, email: &str) -> ResultEngine<Option<String>> {
        let owner = bounded(
            accounts::Entity::find()
                .filter(accounts::Column::Email.eq(email))
                .one(&self.accounts),
        )
        .await?;
        Ok(owner.map(|model| model.id))
    }
}
