//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a verified bearer token in route
//! handlers. Verification fails closed; any bad token is a 401.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use akubata_core::{Role, UserId};

use crate::error::AppError;
use crate::state::AppState;

/// The verified identity behind the current request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User id from the token's `sub` claim.
    pub id: UserId,
    /// Email at token issue time.
    pub email: String,
    /// Role at token issue time.
    pub role: Role,
}

impl CurrentUser {
    /// Check the caller's role against an allowed set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` when the role is not in the set.
    pub fn authorize(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "you do not have permission to perform this action".to_owned(),
            ))
        }
    }
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthenticated("missing bearer token".to_owned()))?;

        let claims = state
            .tokens()
            .verify(token)
            .map_err(|_| AppError::Unauthenticated("invalid or expired token".to_owned()))?;

        Ok(Self(CurrentUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }))
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
