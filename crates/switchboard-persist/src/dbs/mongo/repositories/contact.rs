use async_trait::async_trait;
use mongodb::{bson::doc, bson::oid::ObjectId, bson::Document, Collection, Database};

use switchboard_types::{Contact, NewContact};

use crate::dbs::mongo::models::MongoContact;
use crate::dbs::mongo::parse_id;
use crate::error::Result;
use crate::repositories::ContactRepository;

#[derive(Clone)]
pub struct MongoContactRepository {
    collection: Collection<MongoContact>,
}

impl MongoContactRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("contacts");
        Self { collection }
    }

    async fn find_first(&self, filter: Document) -> Result<Option<Contact>> {
        let contact = self
            .collection
            .find_one(filter)
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?;
        Ok(contact.map(Contact::from))
    }
}

#[async_trait]
impl ContactRepository for MongoContactRepository {
    async fn create(&self, contact: NewContact) -> Result<Contact> {
        let doc = MongoContact {
            id: ObjectId::new(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            created_at: contact.created_at,
            updated_at: contact.created_at,
        };
        self.collection.insert_one(&doc).await?;
        Ok(doc.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        self.find_first(doc! { "_id": id }).await
    }

    async fn find_first_by_phone(&self, phone: &str) -> Result<Option<Contact>> {
        self.find_first(doc! { "phone": phone }).await
    }

    async fn find_first_by_email(&self, email: &str) -> Result<Option<Contact>> {
        self.find_first(doc! { "email": email }).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
