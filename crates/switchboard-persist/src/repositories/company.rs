use async_trait::async_trait;
use chrono::{DateTime, Utc};
use switchboard_types::{Company, CompanyUpdate, NewCompany};

use crate::error::Result;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Fails with `Conflict` when the owner already has a company by that name.
    async fn create(&self, company: NewCompany) -> Result<Company>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>>;

    /// Newest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Company>>;

    /// Returns `None` when the company does not exist.
    async fn update(
        &self,
        id: &str,
        update: CompanyUpdate,
        at: DateTime<Utc>,
    ) -> Result<Option<Company>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}
