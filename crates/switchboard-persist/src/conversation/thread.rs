use switchboard_types::{NewThread, Origin, Thread};

use super::{ConversationManager, Resolved};
use crate::error::Result;

pub const MAX_THREAD_NAME_LENGTH: usize = 100;

/// Threads are named after the message that opened them.
pub fn thread_name(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return "New conversation".to_string();
    }
    trimmed.chars().take(MAX_THREAD_NAME_LENGTH).collect()
}

impl ConversationManager {
    /// Reuse the newest thread for (contact, agent, origin) opened within the
    /// window, or open a new one. The window slides with the clock; old
    /// threads are not expired, just no longer matched.
    pub async fn resolve_thread(
        &self,
        contact_id: &str,
        agent_id: &str,
        origin: Origin,
        content: &str,
    ) -> Result<Resolved<Thread>> {
        let now = self.clock.now();
        let since = now - self.settings.thread_window;

        if let Some(thread) = self
            .threads
            .find_latest_since(contact_id, agent_id, origin, since)
            .await?
        {
            tracing::debug!(thread_id = %thread.id, "thread reused");
            return Ok(Resolved::existing(thread));
        }

        let thread = self
            .threads
            .create(NewThread {
                contact_id: contact_id.to_string(),
                agent_id: agent_id.to_string(),
                name: thread_name(content),
                origin,
                created_at: now,
            })
            .await?;
        tracing::info!(thread_id = %thread.id, agent_id = %agent_id, "thread opened");
        Ok(Resolved::created(thread))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_name_truncates_on_char_boundary() {
        let content = "é".repeat(150);
        let name = thread_name(&content);
        assert_eq!(name.chars().count(), MAX_THREAD_NAME_LENGTH);
    }

    #[test]
    fn test_thread_name_trims() {
        assert_eq!(thread_name("  hi there \n"), "hi there");
        assert_eq!(thread_name("   "), "New conversation");
    }
}
