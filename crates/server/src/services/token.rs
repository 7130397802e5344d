//! Stateless bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the account's id, email, name and
//! admin flag, valid for seven days. Verification failures are not
//! distinguished: an expired, malformed or forged token all read as
//! "not logged in".

use chrono::{Duration, Utc};
use fruit_porter_core::UserId;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::models::User;

const TOKEN_VALIDITY_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: i32,
    email: String,
    name: String,
    is_admin: bool,
    exp: i64,
}

/// The authenticated identity extracted from a verified token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issues a seven-day token for an account.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let claims = Claims {
            id: user.id.as_i32(),
            email: user.email.as_str().to_owned(),
            name: user.name.clone(),
            is_admin: user.is_admin,
            exp: (Utc::now() + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Verifies an `Authorization` header value of the form
    /// `Bearer <token>`. Returns `None` on any failure.
    #[must_use]
    pub fn verify_bearer(&self, header_value: &str) -> Option<CurrentUser> {
        let token = header_value.strip_prefix("Bearer ")?.trim();
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default()).ok()?;
        Some(CurrentUser {
            id: UserId::new(data.claims.id),
            email: data.claims.email,
            name: data.claims.name,
            is_admin: data.claims.is_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use fruit_porter_core::{AccountStatus, Email};
    use rust_decimal::Decimal;

    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from(
            "test-signing-secret-with-plenty-of-entropy-0123",
        ))
    }

    fn user() -> User {
        User {
            id: UserId::new(7),
            email: Email::parse("person@example.com").expect("valid test email"),
            password_hash: String::new(),
            name: "Person".to_owned(),
            phone: None,
            address: None,
            is_admin: true,
            credit: Decimal::ZERO,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_verifies_with_identity_intact() {
        let service = service();
        let token = service.issue(&user()).expect("signing succeeds");
        let current = service
            .verify_bearer(&format!("Bearer {token}"))
            .expect("token verifies");
        assert_eq!(current.id, UserId::new(7));
        assert_eq!(current.email, "person@example.com");
        assert!(current.is_admin);
    }

    #[test]
    fn header_without_bearer_prefix_is_rejected() {
        let service = service();
        let token = service.issue(&user()).expect("signing succeeds");
        assert!(service.verify_bearer(&token).is_none());
    }

    #[test]
    fn token_signed_with_a_different_secret_is_rejected() {
        let token = service().issue(&user()).expect("signing succeeds");
        let other = TokenService::new(&SecretString::from(
            "another-signing-secret-with-plenty-of-entropy",
        ));
        assert!(other.verify_bearer(&format!("Bearer {token}")).is_none());
    }
}
