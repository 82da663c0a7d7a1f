//! Identifier helpers.
//!
//! Ids share the shape of a MongoDB ObjectId (24 lowercase hex characters) no
//! matter which backend produced them, so API clients never see two formats.

pub const ID_LENGTH: usize = 24;

/// Generate a fresh identifier for backends that do not mint their own.
pub fn new_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(ID_LENGTH);
    id
}
