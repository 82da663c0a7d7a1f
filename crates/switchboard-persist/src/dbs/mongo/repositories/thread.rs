use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson, bson::doc, bson::oid::ObjectId, Collection, Database};

use switchboard_types::{NewThread, Origin, Thread};

use crate::dbs::mongo::models::MongoThread;
use crate::dbs::mongo::{parse_id, require_id};
use crate::error::Result;
use crate::repositories::ThreadRepository;

#[derive(Clone)]
pub struct MongoThreadRepository {
    collection: Collection<MongoThread>,
}

impl MongoThreadRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("threads");
        Self { collection }
    }
}

#[async_trait]
impl ThreadRepository for MongoThreadRepository {
    async fn create(&self, thread: NewThread) -> Result<Thread> {
        let doc = MongoThread {
            id: ObjectId::new(),
            contact_id: require_id(&thread.contact_id)?,
            agent_id: require_id(&thread.agent_id)?,
            name: thread.name,
            origin: thread.origin,
            created_at: thread.created_at,
            updated_at: thread.created_at,
        };
        self.collection.insert_one(&doc).await?;
        Ok(doc.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Thread>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let thread = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(thread.map(Thread::from))
    }

    async fn find_latest_since(
        &self,
        contact_id: &str,
        agent_id: &str,
        origin: Origin,
        since: DateTime<Utc>,
    ) -> Result<Option<Thread>> {
        let (Some(contact_id), Some(agent_id)) = (parse_id(contact_id), parse_id(agent_id)) else {
            return Ok(None);
        };
        let filter = doc! {
            "contact_id": contact_id,
            "agent_id": agent_id,
            "origin": origin.as_str(),
            "created_at": { "$gte": bson::DateTime::from_chrono(since) },
        };
        let thread = self
            .collection
            .find_one(filter)
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(thread.map(Thread::from))
    }

    async fn list_by_agent(&self, agent_id: &str) -> Result<Vec<Thread>> {
        let Some(agent_id) = parse_id(agent_id) else {
            return Ok(Vec::new());
        };
        let threads: Vec<MongoThread> = self
            .collection
            .find(doc! { "agent_id": agent_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(threads.into_iter().map(Thread::from).collect())
    }

    async fn exists_for_contact(&self, contact_id: &str) -> Result<bool> {
        let Some(contact_id) = parse_id(contact_id) else {
            return Ok(false);
        };
        let count = self
            .collection
            .count_documents(doc! { "contact_id": contact_id })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_by_agent(&self, agent_id: &str) -> Result<u64> {
        let Some(agent_id) = parse_id(agent_id) else {
            return Ok(0);
        };
        let result = self
            .collection
            .delete_many(doc! { "agent_id": agent_id })
            .await?;
        Ok(result.deleted_count)
    }
}
