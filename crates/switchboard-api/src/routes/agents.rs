use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use switchboard_types::validation::{
    validate_text, Validator, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH,
};
use switchboard_types::{Agent, AgentUpdate, FieldError, NewAgent, Thread, Validate};

use crate::{
    error::ApiResult,
    extract::ValidJson,
    middleware::auth::AuthUser,
    routes::{created, ok, Envelope},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub company_id: Option<String>,
}

impl Validate for CreateAgentRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.require("name", self.name.as_deref(), |name| {
            validate_text("name", name, MAX_NAME_LENGTH)
        })
        .require("companyId", self.company_id.as_deref(), non_blank_id);
        if let Some(description) = &self.description {
            v.check("description", check_description(description));
        }
        v.finish()
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Moves the agent to another company the caller owns.
    pub company_id: Option<String>,
}

impl Validate for UpdateAgentRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            v.check("name", validate_text("name", name, MAX_NAME_LENGTH));
        }
        if let Some(description) = &self.description {
            v.check("description", check_description(description));
        }
        if let Some(company_id) = &self.company_id {
            v.check("companyId", non_blank_id(company_id));
        }
        v.finish()
    }
}

impl From<UpdateAgentRequest> for AgentUpdate {
    fn from(req: UpdateAgentRequest) -> Self {
        Self {
            name: req.name.map(|name| name.trim().to_string()),
            description: req.description,
            company_id: req.company_id.map(|id| id.trim().to_string()),
        }
    }
}

/// Descriptions may be empty.
fn check_description(description: &str) -> Result<(), String> {
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "description is too long ({} chars, max {})",
            len, MAX_DESCRIPTION_LENGTH
        ));
    }
    Ok(())
}

fn non_blank_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        Err("id cannot be empty".to_string())
    } else {
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentListQuery {
    pub company_id: Option<String>,
}

/// Create an agent in one of the caller's companies
#[utoipa::path(
    post,
    path = "/agents",
    request_body = CreateAgentRequest,
    responses(
        (status = 201, description = "Agent created", body = Agent),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 404, description = "Company not found", body = crate::error::ErrorBody),
        (status = 409, description = "Company already has an agent with this name", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "agents"
)]
pub async fn create_agent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<CreateAgentRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Agent>>)> {
    let agent = state
        .persist
        .ownership()
        .create_agent(
            &user.id,
            NewAgent {
                name: req.name.unwrap_or_default().trim().to_string(),
                description: req.description.unwrap_or_default(),
                company_id: req.company_id.unwrap_or_default().trim().to_string(),
                created_at: state.persist.clock().now(),
            },
        )
        .await?;

    tracing::info!(agent_id = %agent.id, company_id = %agent.company_id, "agent created");

    Ok(created(agent))
}

/// Agents across the caller's companies, optionally narrowed to one company
#[utoipa::path(
    get,
    path = "/agents",
    params(("companyId" = Option<String>, Query, description = "Only agents of this company")),
    responses(
        (status = 200, description = "Agents", body = [Agent]),
        (status = 404, description = "Company not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "agents"
)]
pub async fn list_agents(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<AgentListQuery>,
) -> ApiResult<Json<Envelope<Vec<Agent>>>> {
    let agents = state
        .persist
        .ownership()
        .agents(&user.id, query.company_id.as_deref())
        .await?;
    Ok(ok(agents))
}

#[utoipa::path(
    get,
    path = "/agents/{id}",
    params(("id" = String, Path, description = "Agent id")),
    responses(
        (status = 200, description = "Agent", body = Agent),
        (status = 404, description = "Agent not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "agents"
)]
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Agent>>> {
    let (agent, _) = state.persist.ownership().agent(&user.id, &id).await?;
    Ok(ok(agent))
}

#[utoipa::path(
    put,
    path = "/agents/{id}",
    params(("id" = String, Path, description = "Agent id")),
    request_body = UpdateAgentRequest,
    responses(
        (status = 200, description = "Updated agent", body = Agent),
        (status = 404, description = "Agent or destination company not found", body = crate::error::ErrorBody),
        (status = 409, description = "Name already used in the company", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "agents"
)]
pub async fn update_agent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateAgentRequest>,
) -> ApiResult<Json<Envelope<Agent>>> {
    let agent = state
        .persist
        .ownership()
        .update_agent(&user.id, &id, req.into(), state.persist.clock().now())
        .await?;
    Ok(ok(agent))
}

/// Delete an agent with its threads and their messages
#[utoipa::path(
    delete,
    path = "/agents/{id}",
    params(("id" = String, Path, description = "Agent id")),
    responses(
        (status = 200, description = "Deleted agent", body = Agent),
        (status = 404, description = "Agent not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "agents"
)]
pub async fn delete_agent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Agent>>> {
    let agent = state.persist.ownership().delete_agent(&user.id, &id).await?;
    Ok(ok(agent))
}

/// The agent's threads, newest first
#[utoipa::path(
    get,
    path = "/agents/{id}/threads",
    params(("id" = String, Path, description = "Agent id")),
    responses(
        (status = 200, description = "Threads", body = [Thread]),
        (status = 404, description = "Agent not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "agents"
)]
pub async fn list_agent_threads(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<Thread>>>> {
    let threads = state.persist.ownership().threads(&user.id, &id).await?;
    Ok(ok(threads))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_name_and_company() {
        let req = CreateAgentRequest {
            name: Some("  ".to_string()),
            description: None,
            company_id: None,
        };
        let errors = req.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "companyId"]);
    }

    #[test]
    fn test_empty_description_allowed() {
        let req = CreateAgentRequest {
            name: Some("Support".to_string()),
            description: Some(String::new()),
            company_id: Some("65a1b2c3d4e5f6a7b8c9d0e1".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_overlong_description_rejected() {
        let req = UpdateAgentRequest {
            description: Some("x".repeat(MAX_DESCRIPTION_LENGTH + 1)),
            ..Default::default()
        };
        assert_eq!(req.validate().unwrap_err()[0].field, "description");
    }
}
