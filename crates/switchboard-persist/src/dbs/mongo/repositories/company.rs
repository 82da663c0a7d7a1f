use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{bson, bson::doc, bson::oid::ObjectId, Collection, Database};

use switchboard_types::{Company, CompanyUpdate, NewCompany};

use crate::dbs::mongo::models::MongoCompany;
use crate::dbs::mongo::{conflict_or, parse_id, require_id};
use crate::error::Result;
use crate::repositories::CompanyRepository;

#[derive(Clone)]
pub struct MongoCompanyRepository {
    collection: Collection<MongoCompany>,
}

impl MongoCompanyRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("companies");
        Self { collection }
    }
}

#[async_trait]
impl CompanyRepository for MongoCompanyRepository {
    async fn create(&self, company: NewCompany) -> Result<Company> {
        let doc = MongoCompany {
            id: ObjectId::new(),
            owner_id: require_id(&company.owner_id)?,
            name: company.name,
            brand_logo_url: company.brand_logo_url,
            brand_color: company.brand_color,
            notifications: company.notifications,
            created_at: company.created_at,
            updated_at: company.created_at,
        };

        self.collection
            .insert_one(&doc)
            .await
            .map_err(|e| conflict_or(e, format!("Company '{}' already exists", doc.name)))?;
        Ok(doc.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let company = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(company.map(Company::from))
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Company>> {
        let Some(owner_id) = parse_id(owner_id) else {
            return Ok(Vec::new());
        };
        let companies: Vec<MongoCompany> = self
            .collection
            .find(doc! { "owner_id": owner_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(companies.into_iter().map(Company::from).collect())
    }

    async fn update(
        &self,
        id: &str,
        update: CompanyUpdate,
        at: DateTime<Utc>,
    ) -> Result<Option<Company>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let mut set = doc! { "updated_at": bson::DateTime::from_chrono(at) };
        if let Some(name) = &update.name {
            set.insert("name", name.as_str());
        }
        if let Some(url) = &update.brand_logo_url {
            set.insert("brand_logo_url", url.as_str());
        }
        if let Some(color) = &update.brand_color {
            set.insert("brand_color", color.as_str());
        }
        if let Some(notifications) = &update.notifications {
            set.insert("notifications", bson::to_bson(notifications)?);
        }

        let name = update.name.clone().unwrap_or_default();
        let company = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| conflict_or(e, format!("Company '{}' already exists", name)))?;
        Ok(company.map(Company::from))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
