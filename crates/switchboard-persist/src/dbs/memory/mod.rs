//! In-process backend.
//!
//! Each collection is a `RwLock`-guarded map. Uniqueness rules that MongoDB
//! enforces with indexes are checked under the write lock here, so both
//! backends reject the same duplicates.

mod repositories;

use std::sync::Arc;

pub use repositories::{
    MemoryAgentRepository, MemoryCompanyRepository, MemoryContactRepository,
    MemoryMessageRepository, MemoryThreadRepository, MemoryUserRepository,
};

#[derive(Clone, Default)]
pub struct MemoryStore {
    pub users: Arc<MemoryUserRepository>,
    pub companies: Arc<MemoryCompanyRepository>,
    pub agents: Arc<MemoryAgentRepository>,
    pub contacts: Arc<MemoryContactRepository>,
    pub threads: Arc<MemoryThreadRepository>,
    pub messages: Arc<MemoryMessageRepository>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
