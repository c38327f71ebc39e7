//! Ledgers schema.
//!
//! - `ledgers`: ledger metadata and its category taxonomy (JSON text)
//! - `ledger_members`: ordered membership with per-ledger nicknames
//! - `transactions`: entries recorded in a ledger
//! - `transaction_sharers`: how each entry is split among members
//!
//! Member and payer ids refer to accounts that may live in another
//! database, so they carry no foreign key.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Ledgers {
    Table,
    Id,
    Name,
    Notification,
    Theme,
    Currency,
    Categories,
}

#[derive(Iden)]
enum LedgerMembers {
    Table,
    Id,
    LedgerId,
    AccountId,
    Nickname,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    LedgerId,
    AmountMinor,
    RecordTime,
    UpdateTime,
    Action,
    ParentType,
    ChildType,
    Name,
    Payer,
}

#[derive(Iden)]
enum TransactionSharers {
    Table,
    Id,
    TransactionId,
    AccountId,
    AmountMinor,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ledgers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ledgers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Ledgers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Ledgers::Notification)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Ledgers::Theme).string().not_null())
                    .col(ColumnDef::new(Ledgers::Currency).string().not_null())
                    .col(ColumnDef::new(Ledgers::Categories).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LedgerMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerMembers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerMembers::LedgerId).string().not_null())
                    .col(ColumnDef::new(LedgerMembers::AccountId).string().not_null())
                    .col(ColumnDef::new(LedgerMembers::Nickname).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_members-ledger_id")
                            .from(LedgerMembers::Table, LedgerMembers::LedgerId)
                            .to(Ledgers::Table, Ledgers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_members-ledger_id-account_id")
                    .table(LedgerMembers::Table)
                    .col(LedgerMembers::LedgerId)
                    .col(LedgerMembers::AccountId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_members-account_id")
                    .table(LedgerMembers::Table)
                    .col(LedgerMembers::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::LedgerId).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::RecordTime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdateTime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Action).string().not_null())
                    .col(ColumnDef::new(Transactions::ParentType).integer().not_null())
                    .col(ColumnDef::new(Transactions::ChildType).integer().not_null())
                    .col(ColumnDef::new(Transactions::Name).string().not_null())
                    .col(ColumnDef::new(Transactions::Payer).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-ledger_id")
                            .from(Transactions::Table, Transactions::LedgerId)
                            .to(Ledgers::Table, Ledgers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-ledger_id-record_time")
                    .table(Transactions::Table)
                    .col(Transactions::LedgerId)
                    .col(Transactions::RecordTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransactionSharers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransactionSharers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TransactionSharers::TransactionId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionSharers::AccountId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionSharers::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transaction_sharers-transaction_id")
                            .from(TransactionSharers::Table, TransactionSharers::TransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transaction_sharers-transaction_id")
                    .table(TransactionSharers::Table)
                    .col(TransactionSharers::TransactionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TransactionSharers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ledgers::Table).to_owned())
            .await?;
        Ok(())
    }
}
