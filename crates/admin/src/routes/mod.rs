//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness
//! GET  /health/ready            - Readiness (one store read)
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Email + password login
//! POST /logout                  - Clear session cookies
//!
//! # Dashboard
//! GET  /                        - Redirect to /dashboard
//! GET  /dashboard               - Counters and 7-day activity
//!
//! # Users
//! GET  /user                    - User table (?q=&page=)
//! GET  /user/{id}               - User detail
//! POST /user/{id}/status        - Suspend/activate (form)
//! POST /api/users/{id}/status   - Suspend/activate (JSON)
//!
//! # Notifications
//! GET  /notification            - Compose form + history (?q=)
//! POST /notification            - Broadcast
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod users;

use axum::{
    Router,
    http::{Request, Response},
    middleware::from_fn,
    response::Redirect,
    routing::get,
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    request_id_middleware, security_headers_middleware, session_gate_middleware,
};
use crate::state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Flash feedback carried on redirect targets.
#[derive(Debug, Default, Deserialize)]
pub struct FlashParams {
    pub success: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

/// Kind of flash message.
#[derive(Debug, Clone, Copy)]
pub enum Flash {
    Success,
    Warning,
    Error,
}

impl Flash {
    const fn param(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// `path` with a flash message appended as a query parameter.
#[must_use]
pub fn with_flash(path: &str, flash: Flash, message: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!(
        "{path}{separator}{}={}",
        flash.param(),
        urlencoding::encode(message)
    )
}

/// All application routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .merge(health::router())
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(users::router())
        .merge(notifications::router())
}

/// The full application: routes, static files and the middleware stack.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(from_fn(session_gate_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use crate::config::{AdminConfig, FirestoreConfig};
    use crate::store::{DocumentStore, MemoryStore};

    fn test_app() -> Router {
        let config = AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            firestore: FirestoreConfig::emulator("test", "localhost:8080"),
            push: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
            tls: None,
        };
        app(AppState::new(
            config,
            DocumentStore::Memory(MemoryStore::new()),
            None,
        ))
    }

    #[tokio::test]
    async fn test_unknown_route_without_session_goes_to_login() {
        let response = test_app()
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_login_page_renders() {
        let response = test_app()
            .oneshot(Request::get("/login").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["cache-control"], "no-store");
    }

    #[test]
    fn test_with_flash_encodes_message() {
        assert_eq!(
            with_flash("/user/u1", Flash::Success, "User activated successfully!"),
            "/user/u1?success=User%20activated%20successfully%21"
        );
        assert_eq!(
            with_flash("/user?page=2", Flash::Error, "x"),
            "/user?page=2&error=x"
        );
    }
}
