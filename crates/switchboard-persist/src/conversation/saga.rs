use super::ConversationManager;
use crate::error::{PersistError, Result};

/// Undo for a record created earlier in the flow.
#[derive(Debug, Clone)]
pub(crate) enum Compensation {
    DeleteContact(String),
    DeleteThread(String),
    DeleteMessage(String),
}

#[derive(Debug, Default)]
pub(crate) struct Saga {
    steps: Vec<Compensation>,
}

impl Saga {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, step: Compensation) {
        self.steps.push(step);
    }

    /// Undo recorded steps newest first and hand back the error that caused
    /// the abort. Compensation failures are logged, not returned.
    ///
    /// A contact or thread created here may already have been picked up by a
    /// concurrent request. Those are kept: a thread is only removed while it
    /// has no messages, a contact only while no thread points at it.
    pub(crate) async fn abort(
        self,
        manager: &ConversationManager,
        cause: PersistError,
    ) -> PersistError {
        tracing::warn!(error = %cause, steps = self.steps.len(), "rolling back conversation writes");

        for step in self.steps.into_iter().rev() {
            match step.undo(manager).await {
                Ok(true) => tracing::debug!(?step, "compensation applied"),
                Ok(false) => tracing::info!(?step, "record in use by another request, kept"),
                Err(err) => tracing::warn!(?step, error = %err, "compensation failed"),
            }
        }

        cause
    }
}

impl Compensation {
    /// `Ok(false)` when the record was left in place.
    async fn undo(&self, manager: &ConversationManager) -> Result<bool> {
        match self {
            Self::DeleteMessage(id) => {
                manager.messages.delete(id).await?;
                Ok(true)
            }
            Self::DeleteThread(id) => {
                if !manager.messages.list_by_thread(id).await?.is_empty() {
                    return Ok(false);
                }
                manager.threads.delete(id).await?;
                Ok(true)
            }
            Self::DeleteContact(id) => {
                if manager.threads.exists_for_contact(id).await? {
                    return Ok(false);
                }
                manager.contacts.delete(id).await?;
                Ok(true)
            }
        }
    }
}
