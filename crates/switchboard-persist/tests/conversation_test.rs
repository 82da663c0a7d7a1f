use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use switchboard_persist::{
    ConversationManager, ConversationSettings, InboundMessage, MemoryStore, MessageRepository,
    PersistClient, PersistError, Repositories,
};
use switchboard_types::{
    Agent, Clock, ManualClock, Message, MessageRole, NewAgent, NewCompany, NewMessage, Origin,
};

struct Fixture {
    store: MemoryStore,
    clock: Arc<ManualClock>,
    client: PersistClient,
    agent: Agent,
}

async fn fixture() -> Fixture {
    let store = MemoryStore::new();
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let client = PersistClient::new(
        store.clone().into(),
        clock.clone(),
        ConversationSettings::default(),
    );

    let company = client
        .companies()
        .create(NewCompany {
            name: "Acme".to_string(),
            brand_logo_url: None,
            brand_color: None,
            notifications: vec![],
            owner_id: "65a1f0c2e4b0a1b2c3d4e5f6".to_string(),
            created_at: clock.now(),
        })
        .await
        .unwrap();
    let agent = client
        .agents()
        .create(NewAgent {
            name: "Support".to_string(),
            description: "Front desk".to_string(),
            company_id: company.id,
            created_at: clock.now(),
        })
        .await
        .unwrap();

    Fixture {
        store,
        clock,
        client,
        agent,
    }
}

fn whatsapp(content: &str, phone: &str) -> InboundMessage {
    InboundMessage {
        origin: Origin::Whatsapp,
        content: content.to_string(),
        email: None,
        phone: Some(phone.to_string()),
    }
}

fn website(content: &str, email: &str) -> InboundMessage {
    InboundMessage {
        origin: Origin::Website,
        content: content.to_string(),
        email: Some(email.to_string()),
        phone: None,
    }
}

#[tokio::test]
async fn test_first_whatsapp_message_opens_thread_and_contact() {
    let fx = fixture().await;

    let outcome = fx
        .client
        .conversations()
        .send_to_agent(&fx.agent, whatsapp("hi", "+15551234567"))
        .await
        .unwrap();

    assert!(outcome.contact.is_new);
    assert!(outcome.thread.is_new);
    assert_eq!(outcome.contact.value.phone.as_deref(), Some("+15551234567"));
    assert_eq!(outcome.contact.value.name.as_deref(), Some("+15551234567"));
    assert_eq!(outcome.contact.value.email, None);
    assert_eq!(outcome.thread.value.name, "hi");
    assert_eq!(outcome.thread.value.origin, Origin::Whatsapp);
    assert_eq!(outcome.user_message.role, MessageRole::User);
    assert_eq!(outcome.user_message.content, "hi");
    assert_eq!(outcome.assistant_message.role, MessageRole::Assistant);
    assert_eq!(
        outcome.assistant_message.content,
        ConversationSettings::default().canned_reply
    );
    assert!(outcome.assistant_message.created_at > outcome.user_message.created_at);
}

#[tokio::test]
async fn test_second_message_within_window_reuses_thread_and_contact() {
    let fx = fixture().await;
    let conversations = fx.client.conversations();

    let first = conversations
        .send_to_agent(&fx.agent, whatsapp("hi", "+15551234567"))
        .await
        .unwrap();
    fx.clock.advance(Duration::hours(23));
    let second = conversations
        .send_to_agent(&fx.agent, whatsapp("still there?", "+15551234567"))
        .await
        .unwrap();

    assert!(!second.contact.is_new);
    assert!(!second.thread.is_new);
    assert_eq!(second.contact.value.id, first.contact.value.id);
    assert_eq!(second.thread.value.id, first.thread.value.id);
    assert_eq!(fx.store.contacts.count().await, 1);
    assert_eq!(fx.store.threads.count().await, 1);

    let messages = fx
        .client
        .messages()
        .list_by_thread(&first.thread.value.id)
        .await
        .unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents.len(), 4);
    assert_eq!(contents[0], "hi");
    assert_eq!(contents[2], "still there?");
}

#[tokio::test]
async fn test_message_after_window_opens_new_thread_for_same_contact() {
    let fx = fixture().await;
    let conversations = fx.client.conversations();

    let first = conversations
        .send_to_agent(&fx.agent, whatsapp("hi", "+15551234567"))
        .await
        .unwrap();
    fx.clock.advance(Duration::hours(24) + Duration::seconds(1));
    let second = conversations
        .send_to_agent(&fx.agent, whatsapp("hello again", "+15551234567"))
        .await
        .unwrap();

    assert!(!second.contact.is_new);
    assert!(second.thread.is_new);
    assert_eq!(second.contact.value.id, first.contact.value.id);
    assert_ne!(second.thread.value.id, first.thread.value.id);
    assert_eq!(second.thread.value.name, "hello again");

    // The old thread still exists and keeps its messages.
    let old = fx
        .client
        .threads()
        .find_by_id(&first.thread.value.id)
        .await
        .unwrap();
    assert!(old.is_some());
}

#[tokio::test]
async fn test_thread_is_scoped_by_origin() {
    let fx = fixture().await;
    let conversations = fx.client.conversations();

    let web = conversations
        .send_to_agent(&fx.agent, website("hi", "jane@x.com"))
        .await
        .unwrap();
    let insta = conversations
        .send_to_agent(
            &fx.agent,
            InboundMessage {
                origin: Origin::Instagram,
                content: "hi".to_string(),
                email: Some("jane@x.com".to_string()),
                phone: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(web.contact.value.id, insta.contact.value.id);
    assert!(insta.thread.is_new);
    assert_ne!(web.thread.value.id, insta.thread.value.id);
}

#[tokio::test]
async fn test_email_contact_defaults_name_and_ignores_phone() {
    let fx = fixture().await;

    let outcome = fx
        .client
        .conversations()
        .send_to_agent(
            &fx.agent,
            InboundMessage {
                origin: Origin::Website,
                content: "pricing?".to_string(),
                email: Some("Jane.Doe@X.com".to_string()),
                phone: Some("+15551234567".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.contact.value.name.as_deref(), Some("jane.doe"));
    assert_eq!(outcome.contact.value.email.as_deref(), Some("jane.doe@x.com"));
    assert_eq!(outcome.contact.value.phone, None);

    // A whatsapp message from that phone does not match the email contact.
    let wa = fx
        .client
        .conversations()
        .send_to_agent(&fx.agent, whatsapp("hi", "+15551234567"))
        .await
        .unwrap();
    assert!(wa.contact.is_new);
}

#[tokio::test]
async fn test_missing_contact_key_is_invalid_input() {
    let fx = fixture().await;

    let err = fx
        .client
        .conversations()
        .resolve_contact(Origin::Whatsapp, Some("jane@x.com"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PersistError::InvalidInput(_)));
}

/// Fails every assistant message insert.
struct FailingReplies {
    inner: Arc<dyn MessageRepository>,
}

#[async_trait]
impl MessageRepository for FailingReplies {
    async fn create(&self, message: NewMessage) -> switchboard_persist::Result<Message> {
        if message.role == MessageRole::Assistant {
            return Err(PersistError::Internal("disk full".to_string()));
        }
        self.inner.create(message).await
    }

    async fn list_by_thread(&self, thread_id: &str) -> switchboard_persist::Result<Vec<Message>> {
        self.inner.list_by_thread(thread_id).await
    }

    async fn delete(&self, id: &str) -> switchboard_persist::Result<bool> {
        self.inner.delete(id).await
    }

    async fn delete_by_threads(&self, thread_ids: &[String]) -> switchboard_persist::Result<u64> {
        self.inner.delete_by_threads(thread_ids).await
    }
}

#[tokio::test]
async fn test_failed_reply_rolls_back_created_records() {
    let fx = fixture().await;
    let repos: Repositories = fx.store.clone().into();
    let manager = ConversationManager::new(
        repos.contacts.clone(),
        repos.threads.clone(),
        Arc::new(FailingReplies {
            inner: repos.messages.clone(),
        }),
        fx.clock.clone(),
        ConversationSettings::default(),
    );

    let err = manager
        .send_to_agent(&fx.agent, whatsapp("hi", "+15551234567"))
        .await
        .unwrap_err();

    assert!(matches!(err, PersistError::Internal(_)));
    assert_eq!(fx.store.contacts.count().await, 0);
    assert_eq!(fx.store.threads.count().await, 0);
    assert_eq!(fx.store.messages.count().await, 0);
}

#[tokio::test]
async fn test_rollback_keeps_reused_records() {
    let fx = fixture().await;

    let first = fx
        .client
        .conversations()
        .send_to_agent(&fx.agent, whatsapp("hi", "+15551234567"))
        .await
        .unwrap();

    let repos: Repositories = fx.store.clone().into();
    let manager = ConversationManager::new(
        repos.contacts.clone(),
        repos.threads.clone(),
        Arc::new(FailingReplies {
            inner: repos.messages.clone(),
        }),
        fx.clock.clone(),
        ConversationSettings::default(),
    );
    manager
        .send_to_agent(&fx.agent, whatsapp("again", "+15551234567"))
        .await
        .unwrap_err();

    assert_eq!(fx.store.contacts.count().await, 1);
    assert_eq!(fx.store.threads.count().await, 1);
    let messages = fx
        .client
        .messages()
        .list_by_thread(&first.thread.value.id)
        .await
        .unwrap();
    assert_eq!(messages.len(), 2);
}

/// Lets a second sender run to completion just before the first sender's
/// reply fails, so both saw the same freshly created contact and thread.
struct InterleavedReplies {
    inner: Arc<dyn MessageRepository>,
    other_sender: PersistClient,
    agent: Agent,
    fired: AtomicBool,
}

#[async_trait]
impl MessageRepository for InterleavedReplies {
    async fn create(&self, message: NewMessage) -> switchboard_persist::Result<Message> {
        if message.role == MessageRole::Assistant && !self.fired.swap(true, Ordering::SeqCst) {
            self.other_sender
                .conversations()
                .send_to_agent(&self.agent, whatsapp("me too", "+15551234567"))
                .await?;
            return Err(PersistError::Internal("disk full".to_string()));
        }
        self.inner.create(message).await
    }

    async fn list_by_thread(&self, thread_id: &str) -> switchboard_persist::Result<Vec<Message>> {
        self.inner.list_by_thread(thread_id).await
    }

    async fn delete(&self, id: &str) -> switchboard_persist::Result<bool> {
        self.inner.delete(id).await
    }

    async fn delete_by_threads(&self, thread_ids: &[String]) -> switchboard_persist::Result<u64> {
        self.inner.delete_by_threads(thread_ids).await
    }
}

#[tokio::test]
async fn test_rollback_keeps_records_another_request_wrote_into() {
    let fx = fixture().await;
    let repos: Repositories = fx.store.clone().into();
    let manager = ConversationManager::new(
        repos.contacts.clone(),
        repos.threads.clone(),
        Arc::new(InterleavedReplies {
            inner: repos.messages.clone(),
            other_sender: fx.client.clone(),
            agent: fx.agent.clone(),
            fired: AtomicBool::new(false),
        }),
        fx.clock.clone(),
        ConversationSettings::default(),
    );

    manager
        .send_to_agent(&fx.agent, whatsapp("hi", "+15551234567"))
        .await
        .unwrap_err();

    // The first sender's own message is gone; the shared contact and thread
    // survive with the second sender's exchange intact.
    assert_eq!(fx.store.contacts.count().await, 1);
    assert_eq!(fx.store.threads.count().await, 1);
    assert_eq!(fx.store.messages.count().await, 2);

    let threads = fx.client.threads().list_by_agent(&fx.agent.id).await.unwrap();
    let messages = fx
        .client
        .messages()
        .list_by_thread(&threads[0].id)
        .await
        .unwrap();
    assert_eq!(messages[0].content, "me too");
    let contact = fx
        .client
        .contacts()
        .find_by_id(&threads[0].contact_id)
        .await
        .unwrap();
    assert!(contact.is_some());
}
