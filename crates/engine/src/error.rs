//! The module contains the error the engine can throw.
//!
//! Every variant maps to one failure a caller can act on:
//!
//! - [`Validation`] the input was rejected before touching the store.
//! - [`NotAMember`] an account is not part of the ledger it acts on.
//! - [`AlreadyMember`] / [`EmailTaken`] uniqueness conflicts.
//! - [`Database`] / [`Internal`] faults the caller cannot fix.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotAMember`]: EngineError::NotAMember
//!  [`AlreadyMember`]: EngineError::AlreadyMember
//!  [`EmailTaken`]: EngineError::EmailTaken
//!  [`Database`]: EngineError::Database
//!  [`Internal`]: EngineError::Internal
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Which participant of a transaction failed the membership check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberRole {
    Caller,
    Payer,
    Sharer,
}

impl MemberRole {
    fn subject(self) -> &'static str {
        match self {
            Self::Caller => "user",
            Self::Payer => "payer",
            Self::Sharer => "a sharer",
        }
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("{} is not a member of the ledger", .0.subject())]
    NotAMember(MemberRole),
    #[error("user not found in the ledger")]
    MemberNotFound,
    #[error("user already exists in the ledger")]
    AlreadyMember,
    #[error("ledger not found")]
    LedgerNotFound,
    #[error("transaction not found")]
    TransactionNotFound,
    #[error("user not found")]
    AccountNotFound,
    #[error("email already exists")]
    EmailTaken,
    #[error("incorrect password")]
    IncorrectPassword,
    #[error("{0}")]
    Unauthorized(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// True when the database rejected a write because of a unique index.
    pub(crate) fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(err) => matches!(
                err.sql_err(),
                Some(SqlErr::UniqueConstraintViolation(_))
            ),
            _ => false,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotAMember(a), Self::NotAMember(b)) => a == b,
            (Self::MemberNotFound, Self::MemberNotFound) => true,
            (Self::AlreadyMember, Self::AlreadyMember) => true,
            (Self::LedgerNotFound, Self::LedgerNotFound) => true,
            (Self::TransactionNotFound, Self::TransactionNotFound) => true,
            (Self::AccountNotFound, Self::AccountNotFound) => true,
            (Self::EmailTaken, Self::EmailTaken) => true,
            (Self::IncorrectPassword, Self::IncorrectPassword) => true,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_messages_name_the_participant() {
        assert_eq!(
            EngineError::NotAMember(MemberRole::Caller).to_string(),
            "user is not a member of the ledger"
        );
        assert_eq!(
            EngineError::NotAMember(MemberRole::Payer).to_string(),
            "payer is not a member of the ledger"
        );
        assert_eq!(
            EngineError::NotAMember(MemberRole::Sharer).to_string(),
            "a sharer is not a member of the ledger"
        );
    }
}
