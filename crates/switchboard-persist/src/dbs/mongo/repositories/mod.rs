mod agent;
mod company;
mod contact;
mod message;
mod thread;
mod user;

pub use agent::MongoAgentRepository;
pub use company::MongoCompanyRepository;
pub use contact::MongoContactRepository;
pub use message::MongoMessageRepository;
pub use thread::MongoThreadRepository;
pub use user::MongoUserRepository;
