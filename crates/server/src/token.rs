//! Bearer tokens: HS512 JWTs carrying the account id and email.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME_DAYS: i64 = 30;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "UUID")]
    uuid: String,
    sub: String,
    exp: i64,
}

/// Identity attached to authenticated requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header is missing")]
    MissingHeader,
    #[error("token is not correctly formatted as a JWT (missing or invalid segments)")]
    Malformed,
    #[error("token cannot be verified due to problems with the token's signature")]
    Unverifiable,
    #[error("signature validation failed (token's content has been tampered with)")]
    SignatureInvalid,
    #[error("token is expired")]
    Expired,
    #[error("can not handle this token")]
    Unrecognized,
    #[error("failed to issue token: {0}")]
    Issue(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AuthError::Malformed,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::InvalidKeyFormat => AuthError::Unverifiable,
            ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Unrecognized,
        }
    }
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `id`, valid for [`TOKEN_LIFETIME_DAYS`].
    pub fn issue(&self, id: &str, email: &str) -> Result<String, AuthError> {
        self.issue_expiring_at(id, email, Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS))
    }

    pub fn issue_expiring_at(
        &self,
        id: &str,
        email: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            uuid: id.to_string(),
            sub: email.to_string(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding)
            .map_err(|err| AuthError::Issue(err.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(AuthUser {
            id: data.claims.uuid,
            email: data.claims.sub,
        })
    }
}
