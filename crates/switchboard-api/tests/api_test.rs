use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use switchboard_api::{
    build_router, config::Config, notify::BroadcastNotifier, state::AppState,
};
use switchboard_persist::{ConversationSettings, MemoryStore, PersistClient};
use switchboard_types::ManualClock;

const CONFIG: &str = r#"
    [server]
    host = "127.0.0.1"
    port = 0

    [cors]
    enabled = true
    origins = ["*"]

    [storage]
    backend = "memory"

    [mongodb]
    database = "unused"
    pool_size = 1
    timeout_ms = 1000

    [auth]
    token_ttl_days = 7
    bcrypt_cost = 4

    [logging]
    level = "debug"
    format = "pretty"
"#;

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    clock: Arc<ManualClock>,
    store: MemoryStore,
    notifier: Arc<BroadcastNotifier>,
}

fn app() -> TestApp {
    let mut config: Config = toml::from_str(CONFIG).unwrap();
    config.jwt_secret = "integration-test-secret".to_string();

    let store = MemoryStore::new();
    let clock = Arc::new(ManualClock::default());
    let persist = PersistClient::new(
        store.clone().into(),
        clock.clone(),
        ConversationSettings::default(),
    );
    let notifier = Arc::new(BroadcastNotifier::new(16));
    let state = Arc::new(AppState::new(config, persist, notifier.clone()));

    TestApp {
        router: build_router(state.clone()),
        state,
        clock,
        store,
        notifier,
    }
}

impl TestApp {
    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Registers a user and returns its token.
    async fn register(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": "secret123" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn create_company(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/companies",
                Some(token),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_agent(&self, token: &str, company_id: &str, name: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/agents",
                Some(token),
                Some(json!({ "name": name, "description": "Front desk", "companyId": company_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app();
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = app();
    let (status, body) = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "name": "Jane", "email": "Jane@X.com ", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], "jane@x.com");
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "jane@x.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = app.call(Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["name"], "Jane");
    assert_eq!(body["data"]["user"]["email"], "jane@x.com");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = app();
    app.register("Jane", "jane@x.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "name": "Other", "email": "JANE@x.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_register_validation_lists_fields() {
    let app = app();
    let (status, body) = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "nope", "password": "123" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = app();
    app.register("Jane", "jane@x.com").await;

    let (status, wrong_password) = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "jane@x.com", "password": "not-it" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown) = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "ghost@x.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["message"], "Invalid email or password");
    assert_eq!(wrong_password, unknown);
}

#[tokio::test]
async fn test_protected_routes_reject_missing_and_expired_tokens() {
    let app = app();
    let token = app.register("Jane", "jane@x.com").await;

    let (status, _) = app.call(Method::GET, "/companies", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let claims = app.state.tokens.verify(&token).unwrap();
    let expired = app
        .state
        .tokens
        .issue_at(&claims.sub, &claims.email, Utc::now() - Duration::days(8))
        .unwrap();
    let (status, body) = app.call(Method::GET, "/auth/me", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");

    let (status, _) = app
        .call(Method::GET, "/auth/me", Some("not.a.token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_missing_user_is_rejected() {
    let app = app();
    let token = app
        .state
        .tokens
        .issue("65a1f0c2e4b0a1b2c3d4e5f6", "gone@x.com")
        .unwrap();

    let (status, body) = app.call(Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User no longer exists");

    let (status, body) = app
        .call(Method::GET, "/auth/session", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["authenticated"], false);
}

#[tokio::test]
async fn test_session_never_fails() {
    let app = app();
    let (status, body) = app.call(Method::GET, "/auth/session", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["authenticated"], false);

    let (status, body) = app
        .call(Method::GET, "/auth/session", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["authenticated"], false);

    let token = app.register("Jane", "jane@x.com").await;
    let (_, body) = app
        .call(Method::GET, "/auth/session", Some(&token), None)
        .await;
    assert_eq!(body["data"]["authenticated"], true);
    assert_eq!(body["data"]["user"]["email"], "jane@x.com");
}

#[tokio::test]
async fn test_foreign_company_is_not_found() {
    let app = app();
    let alice = app.register("Alice", "alice@x.com").await;
    let bob = app.register("Bob", "bob@x.com").await;
    let company_id = app.create_company(&alice, "Acme").await;

    let (status, foreign) = app
        .call(Method::GET, &format!("/companies/{}", company_id), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, missing) = app
        .call(
            Method::GET,
            "/companies/000000000000000000000000",
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(foreign, missing);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/companies/{}", company_id),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.call(Method::GET, "/companies", Some(&bob), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_company_update_and_duplicate_name() {
    let app = app();
    let token = app.register("Alice", "alice@x.com").await;
    let acme = app.create_company(&token, "Acme").await;
    app.create_company(&token, "Globex").await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/companies/{}", acme),
            Some(&token),
            Some(json!({ "brandColor": "#112233" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["brandColor"], "#112233");
    assert_eq!(body["data"]["name"], "Acme");

    let (status, _) = app
        .call(
            Method::POST,
            "/companies",
            Some(&token),
            Some(json!({ "name": "Acme" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_agent_in_foreign_company_is_rejected() {
    let app = app();
    let alice = app.register("Alice", "alice@x.com").await;
    let bob = app.register("Bob", "bob@x.com").await;
    let company_id = app.create_company(&alice, "Acme").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/agents",
            Some(&bob),
            Some(json!({ "name": "Sneaky", "description": "", "companyId": company_id })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Company not found");

    let agent_id = app.create_agent(&alice, &company_id, "Support").await;
    let (status, _) = app
        .call(Method::GET, &format!("/agents/{}", agent_id), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(
            Method::GET,
            &format!("/agents?companyId={}", company_id),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .call(
            Method::GET,
            &format!("/agents?companyId={}", company_id),
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(body["data"][0]["id"], agent_id.as_str());
}

#[tokio::test]
async fn test_send_to_agent_creates_contact_thread_and_messages() {
    let app = app();
    let mut events = app.notifier.subscribe();
    let token = app.register("Alice", "alice@x.com").await;
    let company_id = app.create_company(&token, "Acme").await;
    let agent_id = app.create_agent(&token, &company_id, "Support").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/messages/send-to-agent",
            Some(&token),
            Some(json!({
                "content": "Hi there",
                "phone": "+5511999999999",
                "origin": "whatsapp",
                "agentId": agent_id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let data = &body["data"];
    assert_eq!(data["thread"]["isNew"], true);
    assert_eq!(data["thread"]["name"], "Hi there");
    assert_eq!(data["thread"]["origin"], "whatsapp");
    assert_eq!(data["contact"]["phone"], "+5511999999999");
    assert_eq!(data["contact"]["email"], Value::Null);
    assert_eq!(data["userMessage"]["role"], "user");
    assert_eq!(data["userMessage"]["content"], "Hi there");
    assert_eq!(data["assistantMessage"]["role"], "assistant");
    assert_eq!(data["userMessage"]["threadId"], data["thread"]["id"]);

    let event = events.recv().await.unwrap();
    assert_eq!(event.channel, format!("agent:{}", agent_id));
    assert_eq!(event.payload["event"], "thread:new");
    assert_eq!(event.payload["threadId"], data["thread"]["id"]);

    let thread_id = data["thread"]["id"].as_str().unwrap().to_string();
    let (status, messages) = app
        .call(
            Method::GET,
            &format!("/threads/{}/messages", thread_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let messages = messages["data"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "assistant");

    let (_, detail) = app
        .call(Method::GET, &format!("/threads/{}", thread_id), Some(&token), None)
        .await;
    assert_eq!(detail["data"]["contact"]["id"], data["contact"]["id"]);
}

#[tokio::test]
async fn test_second_message_reuses_thread_until_window_expires() {
    let app = app();
    let token = app.register("Alice", "alice@x.com").await;
    let company_id = app.create_company(&token, "Acme").await;
    let agent_id = app.create_agent(&token, &company_id, "Support").await;
    let payload = json!({
        "content": "Hello",
        "email": "bob@x.io",
        "origin": "website",
        "agentId": agent_id,
    });

    let (_, first) = app
        .call(Method::POST, "/messages/send-to-agent", Some(&token), Some(payload.clone()))
        .await;
    app.clock.advance(Duration::hours(1));
    let (status, second) = app
        .call(Method::POST, "/messages/send-to-agent", Some(&token), Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["data"]["thread"]["isNew"], false);
    assert_eq!(second["data"]["thread"]["id"], first["data"]["thread"]["id"]);
    assert_eq!(second["data"]["contact"]["id"], first["data"]["contact"]["id"]);

    app.clock.advance(Duration::hours(24));
    let (_, third) = app
        .call(Method::POST, "/messages/send-to-agent", Some(&token), Some(payload))
        .await;
    assert_eq!(third["data"]["thread"]["isNew"], true);
    assert_ne!(third["data"]["thread"]["id"], first["data"]["thread"]["id"]);
    assert_eq!(third["data"]["contact"]["id"], first["data"]["contact"]["id"]);

    let (_, threads) = app
        .call(
            Method::GET,
            &format!("/agents/{}/threads", agent_id),
            Some(&token),
            None,
        )
        .await;
    let threads = threads["data"].as_array().unwrap();
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0]["id"], third["data"]["thread"]["id"]);
}

#[tokio::test]
async fn test_send_to_foreign_agent_writes_nothing() {
    let app = app();
    let alice = app.register("Alice", "alice@x.com").await;
    let bob = app.register("Bob", "bob@x.com").await;
    let company_id = app.create_company(&alice, "Acme").await;
    let agent_id = app.create_agent(&alice, &company_id, "Support").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/messages/send-to-agent",
            Some(&bob),
            Some(json!({
                "content": "Hello",
                "email": "eve@x.io",
                "origin": "instagram",
                "agentId": agent_id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Agent not found");
    assert_eq!(app.store.contacts.count().await, 0);
    assert_eq!(app.store.threads.count().await, 0);
    assert_eq!(app.store.messages.count().await, 0);
}

#[tokio::test]
async fn test_send_to_agent_validation() {
    let app = app();
    let token = app.register("Alice", "alice@x.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/messages/send-to-agent",
            Some(&token),
            Some(json!({
                "content": "Hello",
                "email": "bob@x.io",
                "origin": "whatsapp",
                "agentId": "65a1b2c3d4e5f6a7b8c9d0e1",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "phone");
}

#[tokio::test]
async fn test_deleting_agent_removes_its_conversations() {
    let app = app();
    let token = app.register("Alice", "alice@x.com").await;
    let company_id = app.create_company(&token, "Acme").await;
    let agent_id = app.create_agent(&token, &company_id, "Support").await;

    let (_, sent) = app
        .call(
            Method::POST,
            "/messages/send-to-agent",
            Some(&token),
            Some(json!({
                "content": "Hello",
                "email": "bob@x.io",
                "origin": "tiktok",
                "agentId": agent_id,
            })),
        )
        .await;
    let thread_id = sent["data"]["thread"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .call(Method::DELETE, &format!("/agents/{}", agent_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(Method::GET, &format!("/threads/{}", thread_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.messages.count().await, 0);
    assert_eq!(app.store.contacts.count().await, 1);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = app();
    let (status, body) = app
        .call(Method::GET, "/api/openapi.json", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/messages/send-to-agent"].is_object());
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = app();
    let (status, body) = app.call(Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
