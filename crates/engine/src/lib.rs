//! Shared-expense ledgers: accounts, ledgers with members, and transactions
//! split among those members.
//!
//! All operations go through [`Engine`], which owns the accounts and ledgers
//! database handles.

pub use accounts::{Account, AccountUpdate, NewAccount};
pub use categories::{Categories, ChildCategory, ParentCategory};
pub use error::{EngineError, MemberRole};
pub use ledger_members::Member;
pub use ledgers::{Ledger, LedgerNew, LedgerPatch};
pub use ops::{Engine, EngineBuilder};
pub use sharers::Sharer;
pub use transactions::{Action, Transaction, TransactionDraft, TransactionType};

pub mod validation;

mod accounts;
mod categories;
mod error;
mod ledger_members;
mod ledgers;
mod ops;
mod password;
mod profiles;
mod sharers;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
