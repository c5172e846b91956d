//! Bearer-token issuing and verification.
//!
//! Tokens are HS256 JWTs signed with the configured secret. Verification
//! fails closed: expired, malformed, and bad-signature tokens are all
//! rejected the same way.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use akubata_core::{Role, UserId};

/// Errors from token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token could not be signed.
    #[error("failed to sign token")]
    Signing,

    /// Token is expired, malformed, or carries a bad signature.
    #[error("invalid token")]
    Invalid,
}

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: UserId,
    /// User email at issue time.
    pub email: String,
    /// Role at issue time; re-checked per request, not trusted for writes
    /// beyond route authorization.
    pub role: Role,
    /// Issued-at (UNIX seconds).
    pub iat: i64,
    /// Expiry (UNIX seconds).
    pub exp: i64,
}

/// Issues and verifies HS256 access tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: i64,
}

impl TokenService {
    /// Create a token service from the shared signing secret.
    #[must_use]
    pub fn new(secret: &SecretString, expiry_hours: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            expiry_hours,
        }
    }

    /// Issue a signed token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if signing fails.
    pub fn issue(&self, user_id: UserId, email: &str, role: Role) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_owned(),
            role,
            iat: now,
            exp: now + self.expiry_hours * 3600,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for any verification failure.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(hours: i64) -> TokenService {
        TokenService::new(&SecretString::from("kJ8x2mNp9qRs4tUv7wYz3aBc6dEf1gHi"), hours)
    }

    #[test]
    fn issued_token_round_trips() {
        let svc = service(24);
        let user_id = UserId::generate();

        let token = svc.issue(user_id, "jo@example.com", Role::Staff).unwrap();
        let claims = svc.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "jo@example.com");
        assert_eq!(claims.role, Role::Staff);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service(-1);
        let token = svc
            .issue(UserId::generate(), "jo@example.com", Role::Basic)
            .unwrap();

        assert!(matches!(svc.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let svc = service(24);
        assert!(matches!(
            svc.verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let svc = service(24);
        let other = TokenService::new(&SecretString::from("Zq7bXw3rTp9kLm2vNc8hDf4gJs6yAe1u"), 24);

        let token = other
            .issue(UserId::generate(), "jo@example.com", Role::Admin)
            .unwrap();

        assert!(matches!(svc.verify(&token), Err(TokenError::Invalid)));
    }
}
