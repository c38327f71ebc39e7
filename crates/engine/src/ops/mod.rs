use std::time::Duration;

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::{EngineError, ResultEngine};

mod access;
mod accounts;
mod ledgers;
mod transactions;

/// Upper bound for a single database step.
pub(crate) const DB_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($db:expr, |$tx:ident| $body:expr) => {{
        let $tx = $db.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Await a database step, failing with an internal error after [`DB_TIMEOUT`].
pub(crate) async fn bounded<T, E, F>(step: F) -> ResultEngine<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<EngineError>,
{
    match tokio::time::timeout(DB_TIMEOUT, step).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => {
            tracing::error!("database operation exceeded {DB_TIMEOUT:?}");
            Err(EngineError::Internal(
                "database operation timed out".to_string(),
            ))
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    accounts: DatabaseConnection,
    ledgers: DatabaseConnection,
    password_cost: u32,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    accounts: DatabaseConnection,
    ledgers: DatabaseConnection,
    password_cost: u32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            accounts: DatabaseConnection::default(),
            ledgers: DatabaseConnection::default(),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EngineBuilder {
    /// Use one database for both accounts and ledgers.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.accounts = db.clone();
        self.ledgers = db;
        self
    }

    /// Pass the database holding credentials and profiles
    pub fn accounts_database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.accounts = db;
        self
    }

    /// Pass the database holding ledgers, members and transactions
    pub fn ledgers_database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.ledgers = db;
        self
    }

    /// bcrypt cost for new password hashes.
    pub fn password_cost(mut self, cost: u32) -> EngineBuilder {
        self.password_cost = cost;
        self
    }

    /// Construct `Engine`, checking that both databases answer.
    pub async fn build(self) -> ResultEngine<Engine> {
        bounded(self.accounts.execute_unprepared("SELECT 1")).await?;
        bounded(self.ledgers.execute_unprepared("SELECT 1")).await?;
        Ok(Engine {
            accounts: self.accounts,
            ledgers: self.ledgers,
            password_cost: self.password_cost,
        })
    }
}
