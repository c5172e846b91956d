//! Auth route handlers.
//!
//! Signup, login, profile, and the password flows. Login and signup return a
//! bearer token; everything else on this router except the password-reset
//! endpoints requires one.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::db::addresses::AddressRepository;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::auth::{AuthService, Signup};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token-bearing response for signup and login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: User,
    /// One-line summary of the default shipping address, when one is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_address: Option<String>,
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool());

    let user = auth
        .signup(Signup {
            first_name: &request.first_name,
            last_name: &request.last_name,
            email: &request.email,
            phone_number: request.phone_number.as_deref(),
            password: &request.password,
            confirm_password: &request.confirm_password,
        })
        .await?;

    let token = state
        .tokens()
        .issue(user.id, user.email.as_str(), user.role)
        .map_err(|_| AppError::Internal("failed to issue token".to_owned()))?;

    // Best effort; signup never fails because of mail trouble.
    if let Some(email) = state.email() {
        if let Err(e) = email
            .send_welcome(user.email.as_str(), &user.display_name())
            .await
        {
            tracing::warn!(error = %e, user_id = %user.id, "Failed to send welcome email");
        }
    }

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(AuthResponse {
        message: "Account created".to_owned(),
        token,
        user,
        default_address: None,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool());

    let user = auth.login(&request.email, &request.password).await?;

    let token = state
        .tokens()
        .issue(user.id, user.email.as_str(), user.role)
        .map_err(|_| AppError::Internal("failed to issue token".to_owned()))?;

    let default_address = AddressRepository::new(state.pool())
        .get_default(user.id)
        .await?
        .map(|address| address.summary());

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        message: "Logged in".to_owned(),
        token,
        user,
        default_address,
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy. This endpoint exists
/// so clients have a uniform logout call.
pub async fn logout(RequireAuth(user): RequireAuth) -> Json<Value> {
    clear_sentry_user();
    tracing::info!(user_id = %user.id, "User logged out");

    Json(json!({ "message": "Logged out" }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<User>> {
    let user = AuthService::new(state.pool()).get_user(current.id).await?;
    Ok(Json(user))
}

#[derive(Deserialize)]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<Json<User>> {
    let user = AuthService::new(state.pool())
        .update_profile(
            current.id,
            request.first_name.as_deref(),
            request.last_name.as_deref(),
            request.phone_number.as_deref(),
        )
        .await?;

    Ok(Json(user))
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<Value>> {
    AuthService::new(state.pool())
        .change_password(
            current.id,
            &request.current_password,
            &request.new_password,
            &request.confirm_password,
        )
        .await?;

    Ok(Json(json!({ "message": "Password changed" })))
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /api/auth/forgot-password
///
/// Answers identically whether or not the email is registered, so the
/// endpoint cannot be used to probe for accounts.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<Value>> {
    if let Some((user, token)) = AuthService::new(state.pool())
        .forgot_password(&request.email)
        .await?
    {
        if let Some(email) = state.email() {
            if let Err(e) = email
                .send_password_reset(user.email.as_str(), &user.display_name(), &token)
                .await
            {
                tracing::warn!(error = %e, user_id = %user.id, "Failed to send reset email");
            }
        }
    }

    Ok(Json(json!({
        "message": "If that email is registered, a reset link is on its way"
    })))
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub confirm_password: String,
}

/// POST /api/auth/reset-password/{token}
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<Value>> {
    let user = AuthService::new(state.pool())
        .reset_password(&token, &request.password, &request.confirm_password)
        .await?;

    tracing::info!(user_id = %user.id, "Password reset completed");

    Ok(Json(json!({ "message": "Password reset" })))
}
