//! Shape checks on path identifiers, run before any handler.

use std::collections::HashMap;

use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};

use crate::ServerError;

/// Generated ids are 36 characters of lowercase hex digits and dashes.
fn is_valid_id(value: &str) -> bool {
    value.len() == 36
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn wire_name(param: &str) -> &str {
    match param {
        "ledger_id" => "ULID",
        "transaction_id" => "UTID",
        "account_id" => "UUID",
        other => other,
    }
}

/// Account ids keep their historical wording.
fn invalid_id_message(param: &str) -> String {
    match wire_name(param) {
        "UUID" => "UUID is not valid format".to_string(),
        name => format!("{name} is not in valid format"),
    }
}

pub(crate) async fn validate_path_ids(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    for (param, value) in &params {
        if !is_valid_id(value) {
            tracing::warn!(param = %param, value = %value, "malformed path id");
            return Err(ServerError::Invalid(invalid_id_message(param)));
        }
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_generated_ids() {
        assert!(is_valid_id("3f2b8c1e-9a4d-4c6b-8e2f-0a1b2c3d4e5f"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(!is_valid_id("3F2B8C1E-9A4D-4C6B-8E2F-0A1B2C3D4E5F"));
        assert!(!is_valid_id("3f2b8c1e-9a4d-4c6b-8e2f-0a1b2c3d4e5"));
        assert!(!is_valid_id("3f2b8c1e_9a4d_4c6b_8e2f_0a1b2c3d4e5f"));
        assert!(!is_valid_id(""));
    }

    #[test]
    fn messages_name_the_wire_field() {
        assert_eq!(invalid_id_message("ledger_id"), "ULID is not in valid format");
        assert_eq!(invalid_id_message("transaction_id"), "UTID is not in valid format");
        assert_eq!(invalid_id_message("account_id"), "UUID is not valid format");
    }
}
