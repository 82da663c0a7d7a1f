use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use switchboard_auth::AuthError;
use switchboard_types::validation::{
    validate_email, validate_password, validate_text, Validator, MAX_EMAIL_LENGTH,
    MAX_NAME_LENGTH,
};
use switchboard_types::{FieldError, NewUser, UserProfile, Validate};

use crate::{
    error::{ApiError, ApiResult},
    extract::ValidJson,
    middleware::auth::AuthUser,
    routes::{created, ok, Envelope},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .require("name", self.name.as_deref(), |name| {
                validate_text("name", name, MAX_NAME_LENGTH)
            })
            .require("email", self.email.as_deref(), validate_email)
            .require("password", self.password.as_deref(), validate_password)
            .finish()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .require("email", self.email.as_deref(), |email| {
                validate_text("email", email, MAX_EMAIL_LENGTH)
            })
            .require("password", self.password.as_deref(), |password| {
                if password.is_empty() {
                    Err("password cannot be empty".to_string())
                } else {
                    Ok(())
                }
            })
            .finish()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: AuthUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}

/// Create an account and return a token for it
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 409, description = "Email already registered", body = crate::error::ErrorBody)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<AuthResponse>>)> {
    let name = req.name.unwrap_or_default().trim().to_string();
    let email = NewUser::normalize_email(&req.email.unwrap_or_default());
    let password = req.password.unwrap_or_default();

    let hasher = state.passwords;
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

    let user = state
        .persist
        .users()
        .create(NewUser {
            name,
            email,
            password_hash,
            created_at: state.persist.clock().now(),
        })
        .await?;
    let token = state.tokens.issue(&user.id, &user.email)?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(created(AuthResponse { user, token }))
}

/// Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = crate::error::ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<Json<Envelope<AuthResponse>>> {
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let credentials = state
        .persist
        .users()
        .find_by_email_with_secret(&email)
        .await?;

    // Unknown emails pay for a hash too, so timing does not reveal accounts.
    let hasher = state.passwords;
    let hash = credentials.as_ref().map(|c| c.password_hash.clone());
    let matches = tokio::task::spawn_blocking(move || match hash {
        Some(hash) => hasher.verify(&password, &hash),
        None => hasher.verify_missing(&password),
    })
    .await?;

    let user = match credentials {
        Some(credentials) if matches => credentials.profile,
        Some(credentials) => {
            tracing::warn!(user_id = %credentials.profile.id, "login rejected");
            return Err(ApiError::from(AuthError::InvalidCredentials));
        }
        None => return Err(ApiError::from(AuthError::InvalidCredentials)),
    };
    let token = state.tokens.issue(&user.id, &user.email)?;

    Ok(ok(AuthResponse { user, token }))
}

/// The authenticated caller
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<Envelope<MeResponse>> {
    ok(MeResponse { user })
}

/// Whether the request carries a valid token. Never fails.
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Session state", body = SessionResponse)
    ),
    tag = "auth"
)]
pub async fn session(user: Option<Extension<AuthUser>>) -> Json<Envelope<SessionResponse>> {
    let user = user.map(|Extension(user)| user);
    ok(SessionResponse {
        authenticated: user.is_some(),
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_reports_every_missing_field() {
        let req = RegisterRequest {
            name: None,
            email: Some("not-an-email".to_string()),
            password: Some("abc".to_string()),
        };
        let errors = req.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }

    #[test]
    fn test_login_only_requires_presence() {
        let req = LoginRequest {
            email: Some("jane@x.com".to_string()),
            password: Some("x".to_string()),
        };
        assert!(req.validate().is_ok());
    }
}
