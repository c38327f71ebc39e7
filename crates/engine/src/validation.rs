//! Input checks shared by the engine operations.

use chrono::{DateTime, Utc};

use crate::{EngineError, ResultEngine};

/// Seconds since the Unix epoch, truncated to the low 32 bits.
///
/// Transaction timestamps travel as `u32`, so "now" is compared in the same
/// wrapped space.
pub fn truncated_epoch(now: DateTime<Utc>) -> u32 {
    (now.timestamp() as u64 & u64::from(u32::MAX)) as u32
}

pub(crate) fn required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn email(value: &str) -> ResultEngine<String> {
    let email = required_text(value, "email")?;
    if !email.contains('@') {
        return Err(EngineError::Validation("Invalid email address".to_string()));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn epoch_truncation_keeps_low_bits() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(truncated_epoch(now), 1_700_000_000);

        let wrapped = Utc.timestamp_opt(i64::from(u32::MAX) + 11, 0).unwrap();
        assert_eq!(truncated_epoch(wrapped), 10);
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("  trip ", "name").unwrap(), "trip");
        assert_eq!(
            required_text("   ", "name"),
            Err(EngineError::Validation("name must not be empty".to_string()))
        );
    }

    #[test]
    fn email_needs_an_at_sign() {
        assert_eq!(email(" a@b.c ").unwrap(), "a@b.c");
        assert_eq!(
            email("nobody"),
            Err(EngineError::Validation("Invalid email address".to_string()))
        );
    }
}
