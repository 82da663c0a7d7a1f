use axum::Json;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{error::ErrorBody, middleware::auth::AuthUser, routes};
use switchboard_types::{
    Agent, Company, Contact, FieldError, Message, MessageRole, NotificationChannel,
    NotificationProvider, Origin, Thread, UserProfile,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::auth::register,
        routes::auth::login,
        routes::auth::me,
        routes::auth::session,
        routes::companies::create_company,
        routes::companies::list_companies,
        routes::companies::get_company,
        routes::companies::update_company,
        routes::companies::delete_company,
        routes::agents::create_agent,
        routes::agents::list_agents,
        routes::agents::get_agent,
        routes::agents::update_agent,
        routes::agents::delete_agent,
        routes::agents::list_agent_threads,
        routes::threads::get_thread,
        routes::threads::list_messages,
        routes::messages::send_to_agent,
    ),
    components(schemas(
        ErrorBody,
        FieldError,
        AuthUser,
        UserProfile,
        Company,
        NotificationChannel,
        NotificationProvider,
        Agent,
        Contact,
        Thread,
        Origin,
        Message,
        MessageRole,
        routes::health::HealthResponse,
        routes::auth::RegisterRequest,
        routes::auth::LoginRequest,
        routes::auth::AuthResponse,
        routes::auth::MeResponse,
        routes::auth::SessionResponse,
        routes::companies::CreateCompanyRequest,
        routes::companies::UpdateCompanyRequest,
        routes::agents::CreateAgentRequest,
        routes::agents::UpdateAgentRequest,
        routes::threads::ThreadDetail,
        routes::messages::SendToAgentRequest,
        routes::messages::SendToAgentResponse,
        routes::messages::ThreadSummary,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration, login and session"),
        (name = "companies", description = "Companies owned by the caller"),
        (name = "agents", description = "Agents inside the caller's companies"),
        (name = "threads", description = "Conversations between contacts and agents"),
        (name = "messages", description = "Inbound contact messages")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serve the generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
