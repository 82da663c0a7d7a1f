use async_trait::async_trait;
use switchboard_types::{Contact, NewContact};

use crate::error::Result;

/// Contacts are not unique on phone or email, so the lookups return the
/// oldest match.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, contact: NewContact) -> Result<Contact>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>>;

    async fn find_first_by_phone(&self, phone: &str) -> Result<Option<Contact>>;

    async fn find_first_by_email(&self, email: &str) -> Result<Option<Contact>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}
