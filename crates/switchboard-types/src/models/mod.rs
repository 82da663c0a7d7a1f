mod agent;
mod company;
mod contact;
mod message;
mod thread;
mod user;

pub use agent::{Agent, AgentUpdate, NewAgent};
pub use company::{
    Company, CompanyUpdate, NewCompany, NotificationChannel, NotificationProvider,
};
pub use contact::{Contact, NewContact};
pub use message::{Message, MessageRole, NewMessage, MAX_MESSAGE_LENGTH};
pub use thread::{NewThread, Origin, Thread};
pub use user::{NewUser, UserCredentials, UserProfile};
