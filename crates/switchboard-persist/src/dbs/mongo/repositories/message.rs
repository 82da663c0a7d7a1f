use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, bson::oid::ObjectId, Collection, Database};

use switchboard_types::{Message, NewMessage};

use crate::dbs::mongo::models::MongoMessage;
use crate::dbs::mongo::{parse_id, parse_ids, require_id};
use crate::error::Result;
use crate::repositories::MessageRepository;

#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<MongoMessage>,
}

impl MongoMessageRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("messages");
        Self { collection }
    }
}

#[async_trait]
impl MessageRepository for MongoMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message> {
        let doc = MongoMessage {
            id: ObjectId::new(),
            thread_id: require_id(&message.thread_id)?,
            role: message.role,
            content: message.content,
            created_at: message.created_at,
            updated_at: message.created_at,
        };
        self.collection.insert_one(&doc).await?;
        Ok(doc.into())
    }

    async fn list_by_thread(&self, thread_id: &str) -> Result<Vec<Message>> {
        let Some(thread_id) = parse_id(thread_id) else {
            return Ok(Vec::new());
        };
        let messages: Vec<MongoMessage> = self
            .collection
            .find(doc! { "thread_id": thread_id })
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(messages.into_iter().map(Message::from).collect())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_by_threads(&self, thread_ids: &[String]) -> Result<u64> {
        let ids = parse_ids(thread_ids);
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .collection
            .delete_many(doc! { "thread_id": { "$in": ids } })
            .await?;
        Ok(result.deleted_count)
    }
}
