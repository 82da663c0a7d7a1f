//! Backend-agnostic repository traits, one per collection.

mod agent;
mod company;
mod contact;
mod message;
mod thread;
mod user;

pub use agent::AgentRepository;
pub use company::CompanyRepository;
pub use contact::ContactRepository;
pub use message::MessageRepository;
pub use thread::ThreadRepository;
pub use user::UserRepository;
