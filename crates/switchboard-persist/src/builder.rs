use std::sync::Arc;
#[cfg(feature = "mongodb")]
use std::time::Duration;

use switchboard_types::{Clock, SystemClock};

use crate::client::{PersistClient, Repositories};
use crate::conversation::ConversationSettings;
use crate::dbs::memory::MemoryStore;
use crate::error::{PersistError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    MongoDb,
    Memory,
}

pub struct PersistClientBuilder {
    backend: Backend,
    mongodb_uri: Option<String>,
    database: Option<String>,
    #[cfg(feature = "mongodb")]
    mongo_options: crate::dbs::mongo::MongoOptions,
    clock: Arc<dyn Clock>,
    settings: ConversationSettings,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            backend: Backend::default(),
            mongodb_uri: None,
            database: None,
            #[cfg(feature = "mongodb")]
            mongo_options: crate::dbs::mongo::MongoOptions::default(),
            clock: Arc::new(SystemClock),
            settings: ConversationSettings::default(),
        }
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    #[cfg(feature = "mongodb")]
    pub fn pool_size(mut self, size: u32) -> Self {
        self.mongo_options.pool_size = size;
        self
    }

    #[cfg(feature = "mongodb")]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.mongo_options.timeout = timeout;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn thread_window(mut self, window: chrono::Duration) -> Self {
        self.settings.thread_window = window;
        self
    }

    pub fn canned_reply(mut self, reply: impl Into<String>) -> Self {
        self.settings.canned_reply = reply.into();
        self
    }

    pub async fn build(self) -> Result<PersistClient> {
        let repos: Repositories = match self.backend {
            Backend::Memory => MemoryStore::new().into(),
            Backend::MongoDb => self.connect_mongo().await?,
        };
        Ok(PersistClient::new(repos, self.clock, self.settings))
    }

    #[cfg(feature = "mongodb")]
    async fn connect_mongo(&self) -> Result<Repositories> {
        let mongodb_uri = self
            .mongodb_uri
            .as_deref()
            .ok_or_else(|| PersistError::Internal("mongodb_uri is required".to_string()))?;
        let database = self
            .database
            .as_deref()
            .ok_or_else(|| PersistError::Internal("database is required".to_string()))?;

        let store = crate::dbs::mongo::MongoStore::connect(
            mongodb_uri,
            database,
            self.mongo_options.clone(),
        )
        .await?;
        Ok(store.into())
    }

    #[cfg(not(feature = "mongodb"))]
    async fn connect_mongo(&self) -> Result<Repositories> {
        Err(PersistError::Internal(
            "built without the mongodb feature".to_string(),
        ))
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
