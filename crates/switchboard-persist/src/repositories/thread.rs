use async_trait::async_trait;
use chrono::{DateTime, Utc};
use switchboard_types::{NewThread, Origin, Thread};

use crate::error::Result;

#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn create(&self, thread: NewThread) -> Result<Thread>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Thread>>;

    /// Newest thread for the triple created at or after `since`.
    async fn find_latest_since(
        &self,
        contact_id: &str,
        agent_id: &str,
        origin: Origin,
        since: DateTime<Utc>,
    ) -> Result<Option<Thread>>;

    /// Newest first.
    async fn list_by_agent(&self, agent_id: &str) -> Result<Vec<Thread>>;

    /// Whether any thread, for any agent or origin, points at the contact.
    async fn exists_for_contact(&self, contact_id: &str) -> Result<bool>;

    async fn delete(&self, id: &str) -> Result<bool>;

    async fn delete_by_agent(&self, agent_id: &str) -> Result<u64>;
}
