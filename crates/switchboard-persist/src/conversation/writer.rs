use chrono::Duration;

use switchboard_types::{Message, MessageRole, NewMessage, Thread};

use super::saga::{Compensation, Saga};
use super::ConversationManager;
use crate::error::Result;

impl ConversationManager {
    /// Append the inbound message and the canned assistant reply to `thread`.
    /// If the reply cannot be written the user message is removed again.
    pub async fn write_exchange(&self, thread: &Thread, content: &str) -> Result<(Message, Message)> {
        let user_message = self
            .messages
            .create(NewMessage {
                thread_id: thread.id.clone(),
                role: MessageRole::User,
                content: content.to_string(),
                created_at: self.clock.now(),
            })
            .await?;

        let mut saga = Saga::new();
        saga.record(Compensation::DeleteMessage(user_message.id.clone()));

        // The reply must sort after the message it answers.
        let reply_at = self
            .clock
            .now()
            .max(user_message.created_at + Duration::milliseconds(1));

        let assistant_message = match self
            .messages
            .create(NewMessage {
                thread_id: thread.id.clone(),
                role: MessageRole::Assistant,
                content: self.settings.canned_reply.clone(),
                created_at: reply_at,
            })
            .await
        {
            Ok(message) => message,
            Err(err) => return Err(saga.abort(self, err).await),
        };

        Ok((user_message, assistant_message))
    }
}
