//! bcrypt hashing, run on the blocking pool.

use crate::{EngineError, ResultEngine};

pub(crate) async fn hash(password: String, cost: u32) -> ResultEngine<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|err| EngineError::Internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| EngineError::Internal(format!("failed to hash password: {err}")))
}

pub(crate) async fn verify(password: String, hashed: String) -> ResultEngine<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed))
        .await
        .map_err(|err| EngineError::Internal(format!("password check task failed: {err}")))?
        .map_err(|err| EngineError::Internal(format!("failed to verify password: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn verify_accepts_only_the_original() {
        let hashed = hash("hunter2".to_string(), 4 /* bcrypt minimum cost; bcrypt::MIN_COST is private */).await.unwrap();
        assert_ne!(hashed, "hunter2");
        assert!(verify("hunter2".to_string(), hashed.clone()).await.unwrap());
        assert!(!verify("hunter3".to_string(), hashed).await.unwrap());
    }
}
