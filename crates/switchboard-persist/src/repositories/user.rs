use async_trait::async_trait;
use switchboard_types::{NewUser, UserCredentials, UserProfile};

use crate::error::Result;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with `Conflict` when the email is taken.
    async fn create(&self, user: NewUser) -> Result<UserProfile>;

    /// Lookup used by login; the only read that returns the password hash.
    async fn find_by_email_with_secret(&self, email: &str) -> Result<Option<UserCredentials>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>>;
}
