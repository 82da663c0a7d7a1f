use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use std::sync::Arc;
use std::time::Duration;

use crate::dbs::mongo::repositories::{
    MongoAgentRepository, MongoCompanyRepository, MongoContactRepository,
    MongoMessageRepository, MongoThreadRepository, MongoUserRepository,
};
use crate::error::{PersistError, Result};

#[derive(Debug, Clone)]
pub struct MongoOptions {
    pub pool_size: u32,
    pub timeout: Duration,
}

impl Default for MongoOptions {
    fn default() -> Self {
        Self {
            pool_size: 10,
            timeout: Duration::from_secs(5),
        }
    }
}

pub struct MongoStore {
    pub users: Arc<MongoUserRepository>,
    pub companies: Arc<MongoCompanyRepository>,
    pub agents: Arc<MongoAgentRepository>,
    pub contacts: Arc<MongoContactRepository>,
    pub threads: Arc<MongoThreadRepository>,
    pub messages: Arc<MongoMessageRepository>,
}

impl MongoStore {
    /// Connect to MongoDB, create repositories and make sure indexes exist.
    pub async fn connect(mongodb_uri: &str, database: &str, options: MongoOptions) -> Result<Self> {
        let mut client_options = ClientOptions::parse(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        client_options.max_pool_size = Some(options.pool_size);
        client_options.server_selection_timeout = Some(options.timeout);
        client_options.connect_timeout = Some(options.timeout);

        let client = Client::with_options(client_options)
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        let db = client.database(database);

        ensure_indexes(&db).await?;

        Ok(Self {
            users: Arc::new(MongoUserRepository::new(&db)),
            companies: Arc::new(MongoCompanyRepository::new(&db)),
            agents: Arc::new(MongoAgentRepository::new(&db)),
            contacts: Arc::new(MongoContactRepository::new(&db)),
            threads: Arc::new(MongoThreadRepository::new(&db)),
            messages: Arc::new(MongoMessageRepository::new(&db)),
        })
    }
}

fn unique() -> Option<IndexOptions> {
    Some(IndexOptions::builder().unique(true).build())
}

/// Unique indexes back the Conflict rules; the rest serve the hot lookups.
/// Contact email and phone are intentionally not unique.
async fn ensure_indexes(db: &Database) -> Result<()> {
    let specs = [
        ("users", doc! { "email": 1 }, unique()),
        ("companies", doc! { "owner_id": 1, "name": 1 }, unique()),
        ("agents", doc! { "company_id": 1, "name": 1 }, unique()),
        ("contacts", doc! { "phone": 1 }, None),
        ("contacts", doc! { "email": 1 }, None),
        (
            "threads",
            doc! { "contact_id": 1, "agent_id": 1, "origin": 1, "created_at": -1 },
            None,
        ),
        ("threads", doc! { "agent_id": 1, "created_at": -1 }, None),
        ("messages", doc! { "thread_id": 1, "created_at": 1 }, None),
    ];

    for (collection, keys, options) in specs {
        let model = match options {
            Some(options) => IndexModel::builder().keys(keys).options(options).build(),
            None => IndexModel::builder().keys(keys).build(),
        };
        db.collection::<mongodb::bson::Document>(collection)
            .create_index(model)
            .await?;
    }

    tracing::debug!("MongoDB indexes ensured");
    Ok(())
}
