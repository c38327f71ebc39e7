use serde::{Deserialize, Serialize};

/// Stable machine-readable reason attached to failed responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    NotAMember,
    NotFound,
    Conflict,
    Unauthorized,
    Internal,
}

/// Wrapper around every JSON response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "Status")]
    pub status: bool,
    #[serde(rename = "Data")]
    pub data: Option<T>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
    #[serde(rename = "Code", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: true,
            data: Some(data),
            message: None,
            code: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            status: true,
            data: None,
            message: None,
            code: None,
        }
    }

    pub fn failure(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            status: false,
            data: None,
            message: Some(message.into()),
            code: Some(code),
        }
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct Register {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Registered {
        #[serde(rename = "UUID")]
        pub uuid: String,
        #[serde(rename = "Email")]
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoggedIn {
        #[serde(rename = "UUID")]
        pub uuid: String,
        #[serde(rename = "Token")]
        pub token: String,
    }

    /// Public profile, also the body of a profile update.
    ///
    /// On update `UUID` must name the caller.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Profile {
        #[serde(rename = "UUID")]
        pub uuid: String,
        #[serde(rename = "Username")]
        pub username: String,
        #[serde(rename = "Email")]
        pub email: String,
        #[serde(rename = "Is_Pro", default)]
        pub is_pro: bool,
    }
}

pub mod ledger {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ChildType {
        #[serde(rename = "CTID")]
        pub ctid: u8,
        #[serde(rename = "Name")]
        pub name: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ParentType {
        #[serde(rename = "PTID")]
        pub ptid: u8,
        #[serde(rename = "Name")]
        pub name: String,
        #[serde(rename = "ChildTypes", default)]
        pub child_types: Vec<ChildType>,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct Types {
        #[serde(default)]
        pub parent_types: Vec<ParentType>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Member {
        #[serde(rename = "UUID")]
        pub uuid: String,
        #[serde(rename = "Nickname")]
        pub nickname: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct LedgerNew {
        pub name: String,
        pub notification: bool,
        pub theme: String,
        pub currency: String,
        pub types: Types,
        #[serde(default)]
        pub members: Vec<Member>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Ledger {
        #[serde(rename = "ULID")]
        pub ulid: String,
        #[serde(rename = "Name")]
        pub name: String,
        #[serde(rename = "Notification")]
        pub notification: bool,
        #[serde(rename = "Theme")]
        pub theme: String,
        #[serde(rename = "Currency")]
        pub currency: String,
        #[serde(rename = "Types")]
        pub types: Types,
        #[serde(rename = "Members")]
        pub members: Vec<Member>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerCreated {
        #[serde(rename = "ULID")]
        pub ulid: String,
    }

    /// Metadata update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct LedgerUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub notification: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub theme: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub currency: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct NicknameUpdate {
        pub nickname: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct TransactionType {
        /// One of `income`, `expense`, `transfer`.
        pub action: String,
        pub parent_type: u8,
        pub child_type: u8,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Sharer {
        #[serde(rename = "UUID")]
        pub uuid: String,
        /// Minor units.
        #[serde(rename = "Amount")]
        pub amount: i64,
    }

    /// Body of a create or update request.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct TransactionBody {
        pub amount: i64,
        pub record_time: u32,
        pub update_time: u32,
        #[serde(rename = "Type")]
        pub kind: TransactionType,
        pub name: String,
        pub payer: String,
        #[serde(default)]
        pub sharers: Vec<Sharer>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Transaction {
        #[serde(rename = "UTID")]
        pub utid: String,
        #[serde(rename = "ULID")]
        pub ulid: String,
        #[serde(rename = "Amount")]
        pub amount: i64,
        #[serde(rename = "RecordTime")]
        pub record_time: u32,
        #[serde(rename = "UpdateTime")]
        pub update_time: u32,
        #[serde(rename = "Type")]
        pub kind: TransactionType,
        #[serde(rename = "Name")]
        pub name: String,
        #[serde(rename = "Payer")]
        pub payer: String,
        #[serde(rename = "Sharers")]
        pub sharers: Vec<Sharer>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        #[serde(rename = "UTID")]
        pub utid: String,
    }

    /// Inclusive record-time window, passed as query parameters.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct TimeRange {
        pub start_time: u32,
        pub end_time: u32,
    }
}
