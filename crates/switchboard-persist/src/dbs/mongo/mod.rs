//! MongoDB backend.

pub mod client;
pub mod models;
pub mod repositories;

pub use client::{MongoOptions, MongoStore};

use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteFailure};

use crate::error::{PersistError, Result};

const DUPLICATE_KEY: i32 = 11000;

/// Ids that are not valid ObjectIds can never match a document.
pub(crate) fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

/// For ids that are about to be written as references.
pub(crate) fn require_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| PersistError::InvalidObjectId(id.to_string()))
}

pub(crate) fn parse_ids(ids: &[String]) -> Vec<ObjectId> {
    ids.iter().filter_map(|id| parse_id(id)).collect()
}

pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Turn a unique-index violation into `Conflict`, pass everything else on.
pub(crate) fn conflict_or(err: mongodb::error::Error, message: impl Into<String>) -> PersistError {
    if is_duplicate_key(&err) {
        PersistError::Conflict(message.into())
    } else {
        PersistError::Database(err)
    }
}
