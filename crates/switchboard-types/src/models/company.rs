use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub brand_logo_url: Option<String>,
    pub brand_color: Option<String>,
    pub notifications: Vec<NotificationChannel>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a company wants to be told about new conversations.
/// A company holds at most one channel per provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationChannel {
    pub provider: NotificationProvider,
    pub value: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationProvider {
    Email,
    Whatsapp,
    Sms,
    Slack,
    Webhook,
}

impl NotificationProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Whatsapp => "whatsapp",
            Self::Sms => "sms",
            Self::Slack => "slack",
            Self::Webhook => "webhook",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub brand_logo_url: Option<String>,
    pub brand_color: Option<String>,
    pub notifications: Vec<NotificationChannel>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub brand_logo_url: Option<String>,
    pub brand_color: Option<String>,
    pub notifications: Option<Vec<NotificationChannel>>,
}

impl CompanyUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.brand_logo_url.is_none()
            && self.brand_color.is_none()
            && self.notifications.is_none()
    }

    pub fn apply(&self, company: &mut Company, at: DateTime<Utc>) {
        if let Some(name) = &self.name {
            company.name = name.clone();
        }
        if let Some(url) = &self.brand_logo_url {
            company.brand_logo_url = Some(url.clone());
        }
        if let Some(color) = &self.brand_color {
            company.brand_color = Some(color.clone());
        }
        if let Some(notifications) = &self.notifications {
            company.notifications = notifications.clone();
        }
        company.updated_at = at;
    }
}
