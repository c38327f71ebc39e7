pub use sea_orm_migration::prelude::*;

mod m20240601_000001_accounts;
mod m20240601_000002_ledgers;

/// Schema of the accounts database.
pub struct AccountsMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AccountsMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240601_000001_accounts::Migration)]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("seaql_migrations_accounts").into_iden()
    }
}

/// Schema of the ledgers database.
///
/// Both migrators keep their own bookkeeping table, so they can run against
/// the same connection.
pub struct LedgersMigrator;

#[async_trait::async_trait]
impl MigratorTrait for LedgersMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240601_000002_ledgers::Migration)]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("seaql_migrations_ledgers").into_iden()
    }
}
