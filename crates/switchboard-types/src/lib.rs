//! Core domain types for Switchboard.
//!
//! The models here are storage-agnostic: identifiers are 24-character hex
//! strings and timestamps are UTC `chrono` values. Persistence backends
//! convert to their own representations.

pub mod clock;
pub mod ids;
pub mod models;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use models::{
    Agent, AgentUpdate, Company, CompanyUpdate, Contact, Message, MessageRole, NewAgent,
    NewCompany, NewContact, NewMessage, NewThread, NewUser, NotificationChannel,
    NotificationProvider, Origin, Thread, UserCredentials, UserProfile, MAX_MESSAGE_LENGTH,
};
pub use validation::{FieldError, Validate};
