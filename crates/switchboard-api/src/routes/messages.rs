use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use switchboard_persist::{ConversationOutcome, InboundMessage};
use switchboard_types::validation::{
    validate_email, validate_message_content, validate_phone, Validator,
};
use switchboard_types::{Contact, FieldError, Message, Origin, Thread, Validate};

use crate::{
    error::{ApiError, ApiResult},
    extract::ValidJson,
    middleware::auth::AuthUser,
    notify::{agent_channel, conversation_event},
    routes::{created, Envelope},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendToAgentRequest {
    pub content: Option<String>,
    /// Required unless the origin is whatsapp.
    pub email: Option<String>,
    /// Required when the origin is whatsapp.
    pub phone: Option<String>,
    /// One of whatsapp, instagram, website, tiktok, messenger.
    pub origin: Option<String>,
    pub agent_id: Option<String>,
}

impl Validate for SendToAgentRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.require("content", self.content.as_deref(), validate_message_content);
        v.require("agentId", self.agent_id.as_deref(), |id| {
            if id.trim().is_empty() {
                Err("agentId cannot be empty".to_string())
            } else {
                Ok(())
            }
        });

        let origin = match self.origin.as_deref().map(str::parse::<Origin>) {
            Some(Ok(origin)) => Some(origin),
            Some(Err(_)) => {
                let allowed: Vec<&str> = Origin::ALL.iter().map(Origin::as_str).collect();
                v.push(FieldError::new(
                    "origin",
                    format!("origin must be one of {}", allowed.join(", ")),
                ));
                None
            }
            None => {
                v.push(FieldError::new("origin", "origin is required"));
                None
            }
        };

        // Which contact key is required depends on the origin.
        match origin {
            Some(origin) if origin.uses_phone() => {
                v.require("phone", self.phone.as_deref(), validate_phone);
            }
            Some(_) => {
                v.require("email", self.email.as_deref(), validate_email);
            }
            None => {}
        }
        v.finish()
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    #[serde(flatten)]
    pub thread: Thread,
    pub is_new: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendToAgentResponse {
    pub user_message: Message,
    pub assistant_message: Message,
    pub thread: ThreadSummary,
    pub contact: Contact,
}

impl From<ConversationOutcome> for SendToAgentResponse {
    fn from(outcome: ConversationOutcome) -> Self {
        Self {
            user_message: outcome.user_message,
            assistant_message: outcome.assistant_message,
            thread: ThreadSummary {
                thread: outcome.thread.value,
                is_new: outcome.thread.is_new,
            },
            contact: outcome.contact.value,
        }
    }
}

/// Deliver a contact's message to an agent and record the canned reply
#[utoipa::path(
    post,
    path = "/messages/send-to-agent",
    request_body = SendToAgentRequest,
    responses(
        (status = 201, description = "Message stored with its reply", body = SendToAgentResponse),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 404, description = "Agent not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "messages"
)]
pub async fn send_to_agent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<SendToAgentRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<SendToAgentResponse>>)> {
    let origin: Origin = req
        .origin
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(ApiError::BadRequest)?;
    let agent_id = req.agent_id.unwrap_or_default();

    let (agent, _) = state
        .persist
        .ownership()
        .agent(&user.id, agent_id.trim())
        .await?;

    let outcome = state
        .persist
        .conversations()
        .send_to_agent(
            &agent,
            InboundMessage {
                origin,
                content: req.content.unwrap_or_default(),
                email: req.email,
                phone: req.phone,
            },
        )
        .await?;

    state.notifier.emit(
        &agent_channel(&agent.id),
        conversation_event(
            outcome.thread.is_new,
            &outcome.thread.value.id,
            &[
                outcome.user_message.id.as_str(),
                outcome.assistant_message.id.as_str(),
            ],
        ),
    );

    Ok(created(SendToAgentResponse::from(outcome)))
}
