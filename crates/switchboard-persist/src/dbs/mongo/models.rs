//! MongoDB document shapes and their conversions to the domain models.
//!
//! Identifiers and references are stored as `ObjectId` and timestamps as BSON
//! dates so range queries on `created_at` use the index.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use switchboard_types::{
    Agent, Company, Contact, Message, MessageRole, NotificationChannel, Origin, Thread,
    UserCredentials, UserProfile,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUser {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Projection used by id lookups so the hash never leaves the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUserProfile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoCompany {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub brand_logo_url: Option<String>,
    pub brand_color: Option<String>,
    #[serde(default)]
    pub notifications: Vec<NotificationChannel>,
    pub owner_id: ObjectId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoAgent {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub company_id: ObjectId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoContact {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThread {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub contact_id: ObjectId,
    pub agent_id: ObjectId,
    pub name: String,
    pub origin: Origin,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub thread_id: ObjectId,
    pub role: MessageRole,
    pub content: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<MongoUser> for UserCredentials {
    fn from(user: MongoUser) -> Self {
        Self {
            profile: UserProfile {
                id: user.id.to_hex(),
                name: user.name,
                email: user.email,
                created_at: user.created_at,
                updated_at: user.updated_at,
            },
            password_hash: user.password_hash,
        }
    }
}

impl From<MongoUserProfile> for UserProfile {
    fn from(user: MongoUserProfile) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<MongoCompany> for Company {
    fn from(company: MongoCompany) -> Self {
        Self {
            id: company.id.to_hex(),
            name: company.name,
            brand_logo_url: company.brand_logo_url,
            brand_color: company.brand_color,
            notifications: company.notifications,
            owner_id: company.owner_id.to_hex(),
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

impl From<MongoAgent> for Agent {
    fn from(agent: MongoAgent) -> Self {
        Self {
            id: agent.id.to_hex(),
            name: agent.name,
            description: agent.description,
            company_id: agent.company_id.to_hex(),
            created_at: agent.created_at,
            updated_at: agent.updated_at,
        }
    }
}

impl From<MongoContact> for Contact {
    fn from(contact: MongoContact) -> Self {
        Self {
            id: contact.id.to_hex(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

impl From<MongoThread> for Thread {
    fn from(thread: MongoThread) -> Self {
        Self {
            id: thread.id.to_hex(),
            contact_id: thread.contact_id.to_hex(),
            agent_id: thread.agent_id.to_hex(),
            name: thread.name,
            origin: thread.origin,
            created_at: thread.created_at,
            updated_at: thread.updated_at,
        }
    }
}

impl From<MongoMessage> for Message {
    fn from(message: MongoMessage) -> Self {
        Self {
            id: message.id.to_hex(),
            thread_id: message.thread_id.to_hex(),
            role: message.role,
            content: message.content,
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}
