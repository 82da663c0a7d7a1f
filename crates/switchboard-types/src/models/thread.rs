use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub contact_id: String,
    pub agent_id: String,
    pub name: String,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewThread {
    pub contact_id: String,
    pub agent_id: String,
    pub name: String,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
}

/// Channel a contact message arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Whatsapp,
    Instagram,
    Website,
    Tiktok,
    Messenger,
}

impl Origin {
    pub const ALL: [Origin; 5] = [
        Origin::Whatsapp,
        Origin::Instagram,
        Origin::Website,
        Origin::Tiktok,
        Origin::Messenger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whatsapp => "whatsapp",
            Self::Instagram => "instagram",
            Self::Website => "website",
            Self::Tiktok => "tiktok",
            Self::Messenger => "messenger",
        }
    }

    /// WhatsApp contacts are keyed by phone number, everyone else by email.
    pub fn uses_phone(&self) -> bool {
        matches!(self, Self::Whatsapp)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Origin::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| format!("unknown origin: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_round_trips_through_str() {
        for origin in Origin::ALL {
            assert_eq!(origin.as_str().parse::<Origin>().unwrap(), origin);
        }
        assert!("fax".parse::<Origin>().is_err());
    }

    #[test]
    fn test_only_whatsapp_uses_phone() {
        assert!(Origin::Whatsapp.uses_phone());
        assert!(!Origin::Website.uses_phone());
        assert!(!Origin::Instagram.uses_phone());
    }

    #[test]
    fn test_origin_serializes_lowercase() {
        let json = serde_json::to_string(&Origin::Tiktok).unwrap();
        assert_eq!(json, "\"tiktok\"");
    }
}
