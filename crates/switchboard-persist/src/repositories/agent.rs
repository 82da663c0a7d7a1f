use async_trait::async_trait;
use chrono::{DateTime, Utc};
use switchboard_types::{Agent, AgentUpdate, NewAgent};

use crate::error::Result;

#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Fails with `Conflict` when the company already has an agent by that name.
    async fn create(&self, agent: NewAgent) -> Result<Agent>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Agent>>;

    /// Agents belonging to any of `company_ids`, newest first.
    async fn list_by_companies(&self, company_ids: &[String]) -> Result<Vec<Agent>>;

    async fn update(&self, id: &str, update: AgentUpdate, at: DateTime<Utc>)
        -> Result<Option<Agent>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}
