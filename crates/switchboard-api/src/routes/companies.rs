use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use switchboard_types::validation::{
    validate_hex_color, validate_notifications, validate_text, validate_url, Validator,
    MAX_NAME_LENGTH,
};
use switchboard_types::{
    Company, CompanyUpdate, FieldError, NewCompany, NotificationChannel, Validate,
};

use crate::{
    error::ApiResult,
    extract::ValidJson,
    middleware::auth::AuthUser,
    routes::{created, ok, Envelope},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: Option<String>,
    pub brand_logo_url: Option<String>,
    pub brand_color: Option<String>,
    #[serde(default)]
    pub notifications: Vec<NotificationChannel>,
}

impl Validate for CreateCompanyRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.require("name", self.name.as_deref(), |name| {
            validate_text("name", name, MAX_NAME_LENGTH)
        });
        check_branding(&mut v, &self.brand_logo_url, &self.brand_color);
        v.check("notifications", validate_notifications(&self.notifications));
        v.finish()
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub brand_logo_url: Option<String>,
    pub brand_color: Option<String>,
    pub notifications: Option<Vec<NotificationChannel>>,
}

impl Validate for UpdateCompanyRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            v.check("name", validate_text("name", name, MAX_NAME_LENGTH));
        }
        check_branding(&mut v, &self.brand_logo_url, &self.brand_color);
        if let Some(notifications) = &self.notifications {
            v.check("notifications", validate_notifications(notifications));
        }
        v.finish()
    }
}

fn check_branding(v: &mut Validator, logo_url: &Option<String>, color: &Option<String>) {
    if let Some(url) = logo_url {
        v.check("brandLogoUrl", validate_url(url));
    }
    if let Some(color) = color {
        v.check("brandColor", validate_hex_color(color));
    }
}

impl From<UpdateCompanyRequest> for CompanyUpdate {
    fn from(req: UpdateCompanyRequest) -> Self {
        Self {
            name: req.name.map(|name| name.trim().to_string()),
            brand_logo_url: req.brand_logo_url.map(|url| url.trim().to_string()),
            brand_color: req.brand_color,
            notifications: req.notifications,
        }
    }
}

/// Create a company owned by the caller
#[utoipa::path(
    post,
    path = "/companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = Company),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 409, description = "Caller already has a company with this name", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "companies"
)]
pub async fn create_company(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Company>>)> {
    let company = state
        .persist
        .companies()
        .create(NewCompany {
            name: req.name.unwrap_or_default().trim().to_string(),
            brand_logo_url: req.brand_logo_url.map(|url| url.trim().to_string()),
            brand_color: req.brand_color,
            notifications: req.notifications,
            owner_id: user.id,
            created_at: state.persist.clock().now(),
        })
        .await?;

    tracing::info!(company_id = %company.id, owner_id = %company.owner_id, "company created");

    Ok(created(company))
}

/// Companies owned by the caller, newest first
#[utoipa::path(
    get,
    path = "/companies",
    responses(
        (status = 200, description = "Caller's companies", body = [Company])
    ),
    security(("bearer_auth" = [])),
    tag = "companies"
)]
pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Envelope<Vec<Company>>>> {
    let companies = state.persist.ownership().companies(&user.id).await?;
    Ok(ok(companies))
}

#[utoipa::path(
    get,
    path = "/companies/{id}",
    params(("id" = String, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company", body = Company),
        (status = 404, description = "Company not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "companies"
)]
pub async fn get_company(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Company>>> {
    let company = state.persist.ownership().company(&user.id, &id).await?;
    Ok(ok(company))
}

#[utoipa::path(
    put,
    path = "/companies/{id}",
    params(("id" = String, Path, description = "Company id")),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Updated company", body = Company),
        (status = 404, description = "Company not found", body = crate::error::ErrorBody),
        (status = 409, description = "Name already used by another of the caller's companies", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "companies"
)]
pub async fn update_company(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateCompanyRequest>,
) -> ApiResult<Json<Envelope<Company>>> {
    let company = state
        .persist
        .ownership()
        .update_company(&user.id, &id, req.into(), state.persist.clock().now())
        .await?;
    Ok(ok(company))
}

/// Delete a company together with its agents and their conversations
#[utoipa::path(
    delete,
    path = "/companies/{id}",
    params(("id" = String, Path, description = "Company id")),
    responses(
        (status = 200, description = "Deleted company", body = Company),
        (status = 404, description = "Company not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "companies"
)]
pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Company>>> {
    let company = state.persist.ownership().delete_company(&user.id, &id).await?;
    Ok(ok(company))
}
