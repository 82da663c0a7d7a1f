//! Persistence for Switchboard.
//!
//! Every resource sits behind a repository trait with two backends: MongoDB
//! (feature `mongodb`, on by default) and an in-process store used by tests
//! and local development. On top of the repositories live the ownership rules
//! and the send-to-agent conversation flow.

pub mod builder;
pub mod client;
pub mod conversation;
pub mod dbs;
pub mod error;
pub mod ownership;
pub mod repositories;

pub use builder::{Backend, PersistClientBuilder};
pub use client::{PersistClient, Repositories};
pub use conversation::{
    ConversationManager, ConversationOutcome, ConversationSettings, InboundMessage, Resolved,
};
pub use dbs::memory::MemoryStore;
pub use error::{PersistError, Result};
pub use ownership::OwnershipResolver;
pub use repositories::{
    AgentRepository, CompanyRepository, ContactRepository, MessageRepository, ThreadRepository,
    UserRepository,
};
