use async_trait::async_trait;
use switchboard_types::{Message, NewMessage};

use crate::error::Result;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: NewMessage) -> Result<Message>;

    /// Oldest first.
    async fn list_by_thread(&self, thread_id: &str) -> Result<Vec<Message>>;

    async fn delete(&self, id: &str) -> Result<bool>;

    async fn delete_by_threads(&self, thread_ids: &[String]) -> Result<u64>;
}
