//! Integration test harness for the Spot My Ride admin dashboard.
//!
//! Tests drive the full router (middleware included) in-process with
//! `tower::ServiceExt::oneshot`, backed by the in-memory document store.
//! Push delivery goes to a local stub server that records each request.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p spot-my-ride-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, Response, header};
use axum::{Json, Router, routing::post};
use secrecy::SecretString;
use serde_json::Value as JsonValue;
use tower::ServiceExt;
use url::Url;

use spot_my_ride_admin::config::{AdminConfig, FirestoreConfig, PushConfig};
use spot_my_ride_admin::routes;
use spot_my_ride_admin::services::AdminAuthService;
use spot_my_ride_admin::services::PushClient;
use spot_my_ride_admin::state::AppState;
use spot_my_ride_admin::store::{DocumentStore, Fields, MemoryStore, Value, collections};
use spot_my_ride_core::Email;

pub const ADMIN_EMAIL: &str = "ops@spotmyride.app";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Configuration suitable for in-process tests.
#[must_use]
pub fn test_config(push: Option<PushConfig>) -> AdminConfig {
    AdminConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3001".to_string(),
        session_secret: SecretString::from("kR9#vT2!qLm8$wZx4@bN7&pY3*hJ6^cF"),
        firestore: FirestoreConfig::emulator("spot-my-ride-test", "localhost:8080"),
        push,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}

/// One in-process application over a fresh memory store.
pub struct TestContext {
    pub memory: MemoryStore,
    pub app: Router,
}

impl TestContext {
    /// Application without a push endpoint.
    pub async fn new() -> Self {
        Self::build(None).await
    }

    /// Application whose push client targets `endpoint`.
    pub async fn with_push(endpoint: Url) -> Self {
        Self::build(Some(PushConfig { endpoint })).await
    }

    async fn build(push: Option<PushConfig>) -> Self {
        let memory = MemoryStore::new();
        let store = DocumentStore::Memory(memory.clone());
        let push_client = push.as_ref().map(|p| PushClient::new(p).unwrap());

        AdminAuthService::new(&store)
            .create_admin(&Email::parse(ADMIN_EMAIL).unwrap(), "Ops", ADMIN_PASSWORD)
            .await
            .unwrap();

        let state = AppState::new(test_config(push), store, push_client);
        Self {
            memory,
            app: routes::app(state),
        }
    }

    /// Store an end-user account.
    pub async fn seed_account(
        &self,
        id: &str,
        name: &str,
        phone: &str,
        device_token: Option<&str>,
    ) {
        let mut fields = Fields::new();
        fields.insert("name".into(), Value::string(name));
        fields.insert(
            "email".into(),
            Value::string(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        );
        fields.insert("phoneNumber".into(), Value::string(phone));
        fields.insert("active".into(), Value::from(true));
        if let Some(token) = device_token {
            fields.insert("deviceToken".into(), Value::string(token));
        }
        self.memory.put(collections::USERS, id, fields).await;
    }

    /// Run one request through the full middleware stack.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Log in as the seeded admin and return a `Cookie` header value.
    pub async fn login(&self) -> String {
        let response = self
            .send(form_request("/login", None, &login_body(ADMIN_EMAIL, ADMIN_PASSWORD)))
            .await;
        assert!(response.status().is_redirection(), "login failed: {}", response.status());
        cookie_header(&response)
    }
}

/// URL-encoded login form body.
#[must_use]
pub fn login_body(email: &str, password: &str) -> String {
    format!(
        "email={}&password={}",
        urlencoding::encode(email),
        urlencoding::encode(password)
    )
}

/// GET request, optionally authenticated.
#[must_use]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// POST with a form body, optionally authenticated.
#[must_use]
pub fn form_request(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

/// Collapse `Set-Cookie` headers into a `Cookie` request header.
#[must_use]
pub fn cookie_header(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

/// Read a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Local push endpoint that records every payload it receives.
pub struct PushStub {
    pub endpoint: Url,
    pub received: Arc<Mutex<Vec<JsonValue>>>,
}

impl PushStub {
    pub async fn start() -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let app = Router::new().route(
            "/send",
            post(move |Json(payload): Json<JsonValue>| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().unwrap().push(payload);
                    Json(serde_json::json!({ "ok": true }))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            endpoint: Url::parse(&format!("http://127.0.0.1:{}/send", addr.port())).unwrap(),
            received,
        }
    }

    #[must_use]
    pub fn payloads(&self) -> Vec<JsonValue> {
        self.received.lock().unwrap().clone()
    }
}
