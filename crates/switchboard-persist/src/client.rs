use std::sync::Arc;

use switchboard_types::{Clock, SystemClock};

use crate::builder::PersistClientBuilder;
use crate::conversation::{ConversationManager, ConversationSettings};
use crate::dbs::memory::MemoryStore;
use crate::ownership::OwnershipResolver;
use crate::repositories::{
    AgentRepository, CompanyRepository, ContactRepository, MessageRepository, ThreadRepository,
    UserRepository,
};

/// One handle per collection, independent of the backend behind them.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub agents: Arc<dyn AgentRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub threads: Arc<dyn ThreadRepository>,
    pub messages: Arc<dyn MessageRepository>,
}

impl From<MemoryStore> for Repositories {
    fn from(store: MemoryStore) -> Self {
        Self {
            users: store.users,
            companies: store.companies,
            agents: store.agents,
            contacts: store.contacts,
            threads: store.threads,
            messages: store.messages,
        }
    }
}

#[cfg(feature = "mongodb")]
impl From<crate::dbs::mongo::MongoStore> for Repositories {
    fn from(store: crate::dbs::mongo::MongoStore) -> Self {
        Self {
            users: store.users,
            companies: store.companies,
            agents: store.agents,
            contacts: store.contacts,
            threads: store.threads,
            messages: store.messages,
        }
    }
}

#[derive(Clone)]
pub struct PersistClient {
    repos: Repositories,
    clock: Arc<dyn Clock>,
    ownership: OwnershipResolver,
    conversations: ConversationManager,
}

impl PersistClient {
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>, settings: ConversationSettings) -> Self {
        let ownership = OwnershipResolver::new(
            repos.companies.clone(),
            repos.agents.clone(),
            repos.threads.clone(),
            repos.messages.clone(),
        );
        let conversations = ConversationManager::new(
            repos.contacts.clone(),
            repos.threads.clone(),
            repos.messages.clone(),
            clock.clone(),
            settings,
        );

        Self {
            repos,
            clock,
            ownership,
            conversations,
        }
    }

    /// Fresh in-memory backend on the system clock.
    pub fn in_memory() -> Self {
        Self::new(
            MemoryStore::new().into(),
            Arc::new(SystemClock),
            ConversationSettings::default(),
        )
    }

    pub fn builder() -> PersistClientBuilder {
        PersistClientBuilder::new()
    }

    pub fn users(&self) -> &dyn UserRepository {
        self.repos.users.as_ref()
    }

    pub fn companies(&self) -> &dyn CompanyRepository {
        self.repos.companies.as_ref()
    }

    pub fn agents(&self) -> &dyn AgentRepository {
        self.repos.agents.as_ref()
    }

    pub fn contacts(&self) -> &dyn ContactRepository {
        self.repos.contacts.as_ref()
    }

    pub fn threads(&self) -> &dyn ThreadRepository {
        self.repos.threads.as_ref()
    }

    pub fn messages(&self) -> &dyn MessageRepository {
        self.repos.messages.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn ownership(&self) -> &OwnershipResolver {
        &self.ownership
    }

    pub fn conversations(&self) -> &ConversationManager {
        &self.conversations
    }
}
