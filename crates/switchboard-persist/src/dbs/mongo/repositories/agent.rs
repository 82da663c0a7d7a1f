use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{bson, bson::doc, bson::oid::ObjectId, Collection, Database};

use switchboard_types::{Agent, AgentUpdate, NewAgent};

use crate::dbs::mongo::models::MongoAgent;
use crate::dbs::mongo::{conflict_or, parse_id, parse_ids, require_id};
use crate::error::Result;
use crate::repositories::AgentRepository;

#[derive(Clone)]
pub struct MongoAgentRepository {
    collection: Collection<MongoAgent>,
}

impl MongoAgentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("agents");
        Self { collection }
    }
}

#[async_trait]
impl AgentRepository for MongoAgentRepository {
    async fn create(&self, agent: NewAgent) -> Result<Agent> {
        let doc = MongoAgent {
            id: ObjectId::new(),
            company_id: require_id(&agent.company_id)?,
            name: agent.name,
            description: agent.description,
            created_at: agent.created_at,
            updated_at: agent.created_at,
        };

        self.collection.insert_one(&doc).await.map_err(|e| {
            conflict_or(e, format!("Agent '{}' already exists in this company", doc.name))
        })?;
        Ok(doc.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Agent>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let agent = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(agent.map(Agent::from))
    }

    async fn list_by_companies(&self, company_ids: &[String]) -> Result<Vec<Agent>> {
        let ids = parse_ids(company_ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let agents: Vec<MongoAgent> = self
            .collection
            .find(doc! { "company_id": { "$in": ids } })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(agents.into_iter().map(Agent::from).collect())
    }

    async fn update(
        &self,
        id: &str,
        update: AgentUpdate,
        at: DateTime<Utc>,
    ) -> Result<Option<Agent>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let mut set = doc! { "updated_at": bson::DateTime::from_chrono(at) };
        if let Some(name) = &update.name {
            set.insert("name", name.as_str());
        }
        if let Some(description) = &update.description {
            set.insert("description", description.as_str());
        }
        if let Some(company_id) = &update.company_id {
            set.insert("company_id", require_id(company_id)?);
        }

        let agent = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| conflict_or(e, "An agent with that name already exists in this company"))?;
        Ok(agent.map(Agent::from))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
