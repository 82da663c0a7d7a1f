use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use switchboard_types::{Contact, Message, Thread};

use crate::{
    error::ApiResult,
    middleware::auth::AuthUser,
    routes::{ok, Envelope},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ThreadDetail {
    pub thread: Thread,
    /// `None` only if the contact was removed out of band.
    pub contact: Option<Contact>,
}

#[utoipa::path(
    get,
    path = "/threads/{id}",
    params(("id" = String, Path, description = "Thread id")),
    responses(
        (status = 200, description = "Thread with its contact", body = ThreadDetail),
        (status = 404, description = "Thread not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "threads"
)]
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<ThreadDetail>>> {
    let (thread, _) = state.persist.ownership().thread(&user.id, &id).await?;
    let contact = state.persist.contacts().find_by_id(&thread.contact_id).await?;
    Ok(ok(ThreadDetail { thread, contact }))
}

/// Messages of a thread, oldest first
#[utoipa::path(
    get,
    path = "/threads/{id}/messages",
    params(("id" = String, Path, description = "Thread id")),
    responses(
        (status = 200, description = "Messages", body = [Message]),
        (status = 404, description = "Thread not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "threads"
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<Message>>>> {
    let messages = state.persist.ownership().messages(&user.id, &id).await?;
    Ok(ok(messages))
}
