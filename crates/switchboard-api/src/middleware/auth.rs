//! Bearer-token access guard.
//!
//! `require_auth` rejects the request with 401 unless the `Authorization`
//! header carries a valid token for a user that still exists. `optional_auth`
//! runs the same checks but lets the request through anonymously when they
//! fail.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use switchboard_auth::AuthError;

use crate::{error::ApiError, state::AppState};

/// The authenticated caller, inserted into request extensions.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers()).await?;
    tracing::debug!(user_id = %user.id, "request authenticated");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers()).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
        }
        Err(ApiError::Internal(detail)) => {
            tracing::warn!(error = %detail, "optional authentication failed");
        }
        Err(_) => {}
    }
    next.run(request).await
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = bearer_token(headers).ok_or(AuthError::Unauthenticated)?;
    let claims = state.tokens.verify(token)?;

    let profile = state
        .persist
        .users()
        .find_by_id(&claims.sub)
        .await?
        .ok_or(AuthError::UnknownSubject)?;

    Ok(AuthUser {
        id: profile.id,
        email: profile.email,
        name: profile.name,
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
