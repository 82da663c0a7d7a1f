//! The send-to-agent flow.
//!
//! `Validated → AgentLookup → ContactResolved → ThreadResolved →
//! UserMessageWritten → AssistantMessageWritten → Responded`
//!
//! Agent lookup and validation happen before `send_to_agent` is called. The
//! remaining steps run here in order; each write that creates a record
//! registers a compensation, and a failure in a later step undoes them in
//! reverse before the error is returned.

mod contact;
mod saga;
mod thread;
mod writer;

use chrono::Duration;
use std::sync::Arc;

use switchboard_types::{Agent, Clock, Contact, Message, Origin, Thread};

use crate::error::Result;
use crate::repositories::{ContactRepository, MessageRepository, ThreadRepository};
use saga::{Compensation, Saga};

pub use contact::default_contact_name;
pub use thread::{thread_name, MAX_THREAD_NAME_LENGTH};

pub const DEFAULT_CANNED_REPLY: &str =
    "Thanks for reaching out! An agent will get back to you shortly.";

#[derive(Debug, Clone)]
pub struct ConversationSettings {
    /// How far back an existing thread is still considered active.
    pub thread_window: Duration,
    pub canned_reply: String,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            thread_window: Duration::hours(24),
            canned_reply: DEFAULT_CANNED_REPLY.to_string(),
        }
    }
}

/// A lookup result that remembers whether the record had to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub is_new: bool,
}

impl<T> Resolved<T> {
    pub fn existing(value: T) -> Self {
        Self {
            value,
            is_new: false,
        }
    }

    pub fn created(value: T) -> Self {
        Self {
            value,
            is_new: true,
        }
    }
}

/// An inbound contact message, already validated.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub origin: Origin,
    pub content: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConversationOutcome {
    pub contact: Resolved<Contact>,
    pub thread: Resolved<Thread>,
    pub user_message: Message,
    pub assistant_message: Message,
}

#[derive(Clone)]
pub struct ConversationManager {
    contacts: Arc<dyn ContactRepository>,
    threads: Arc<dyn ThreadRepository>,
    messages: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
    settings: ConversationSettings,
}

impl ConversationManager {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        threads: Arc<dyn ThreadRepository>,
        messages: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            contacts,
            threads,
            messages,
            clock,
            settings,
        }
    }

    /// Run the whole flow for `agent`, which the caller has already resolved
    /// and authorized.
    pub async fn send_to_agent(
        &self,
        agent: &Agent,
        inbound: InboundMessage,
    ) -> Result<ConversationOutcome> {
        let mut saga = Saga::new();

        let contact = self
            .resolve_contact(
                inbound.origin,
                inbound.email.as_deref(),
                inbound.phone.as_deref(),
            )
            .await?;
        if contact.is_new {
            saga.record(Compensation::DeleteContact(contact.value.id.clone()));
        }

        let thread = match self
            .resolve_thread(&contact.value.id, &agent.id, inbound.origin, &inbound.content)
            .await
        {
            Ok(thread) => thread,
            Err(err) => return Err(saga.abort(self, err).await),
        };
        if thread.is_new {
            saga.record(Compensation::DeleteThread(thread.value.id.clone()));
        }

        let (user_message, assistant_message) =
            match self.write_exchange(&thread.value, &inbound.content).await {
                Ok(messages) => messages,
                Err(err) => return Err(saga.abort(self, err).await),
            };

        tracing::info!(
            agent_id = %agent.id,
            contact_id = %contact.value.id,
            thread_id = %thread.value.id,
            new_contact = contact.is_new,
            new_thread = thread.is_new,
            "message delivered to agent"
        );

        Ok(ConversationOutcome {
            contact,
            thread,
            user_message,
            assistant_message,
        })
    }
}
