use async_trait::async_trait;
use mongodb::{bson::doc, bson::oid::ObjectId, Collection, Database};

use switchboard_types::{NewUser, UserCredentials, UserProfile};

use crate::dbs::mongo::models::{MongoUser, MongoUserProfile};
use crate::dbs::mongo::{conflict_or, parse_id};
use crate::error::Result;
use crate::repositories::UserRepository;

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<MongoUser>,
    profiles: Collection<MongoUserProfile>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<MongoUser>("users");
        let profiles = collection.clone_with_type::<MongoUserProfile>();
        Self {
            collection,
            profiles,
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: NewUser) -> Result<UserProfile> {
        let doc = MongoUser {
            id: ObjectId::new(),
            name: user.name,
            email: NewUser::normalize_email(&user.email),
            password_hash: user.password_hash,
            created_at: user.created_at,
            updated_at: user.created_at,
        };

        self.collection
            .insert_one(&doc)
            .await
            .map_err(|e| conflict_or(e, "Email already registered"))?;

        Ok(UserCredentials::from(doc).profile)
    }

    async fn find_by_email_with_secret(&self, email: &str) -> Result<Option<UserCredentials>> {
        let filter = doc! { "email": NewUser::normalize_email(email) };
        let user = self.collection.find_one(filter).await?;
        Ok(user.map(UserCredentials::from))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let profile = self
            .profiles
            .find_one(doc! { "_id": id })
            .projection(doc! { "password_hash": 0 })
            .await?;
        Ok(profile.map(UserProfile::from))
    }
}
