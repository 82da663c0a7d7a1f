use switchboard_types::{Contact, NewContact, Origin};

use super::{ConversationManager, Resolved};
use crate::error::{PersistError, Result};

/// Name given to a contact first seen by email: the local part, or `-` when
/// there is none.
pub fn default_contact_name(email: &str) -> String {
    match email.split_once('@') {
        Some((local, _)) if !local.is_empty() => local.to_string(),
        _ => "-".to_string(),
    }
}

impl ConversationManager {
    /// Find a contact by the key its origin uses (phone for WhatsApp, email
    /// otherwise) or create one. The other key is neither matched nor stored.
    pub async fn resolve_contact(
        &self,
        origin: Origin,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Resolved<Contact>> {
        let now = self.clock.now();

        let (existing, new_contact) = if origin.uses_phone() {
            let phone = phone
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    PersistError::InvalidInput("phone is required for whatsapp".to_string())
                })?;
            let existing = self.contacts.find_first_by_phone(phone).await?;
            let new_contact = NewContact {
                name: Some(phone.to_string()),
                email: None,
                phone: Some(phone.to_string()),
                created_at: now,
            };
            (existing, new_contact)
        } else {
            let email = email
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .ok_or_else(|| {
                    PersistError::InvalidInput(format!("email is required for {}", origin))
                })?;
            let existing = self.contacts.find_first_by_email(&email).await?;
            let new_contact = NewContact {
                name: Some(default_contact_name(&email)),
                email: Some(email),
                phone: None,
                created_at: now,
            };
            (existing, new_contact)
        };

        if let Some(contact) = existing {
            tracing::debug!(contact_id = %contact.id, "contact reused");
            return Ok(Resolved::existing(contact));
        }

        let contact = self.contacts.create(new_contact).await?;
        tracing::info!(contact_id = %contact.id, origin = %origin, "contact created");
        Ok(Resolved::created(contact))
    }
}
