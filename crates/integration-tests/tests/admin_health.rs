//! Health probes, static assets and response headers.

use axum::http::{StatusCode, header};
use spot_my_ride_integration_tests::{TestContext, body_text, get};

#[tokio::test]
async fn test_liveness() {
    let ctx = TestContext::new().await;
    let response = ctx.send(get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_follows_store() {
    let ctx = TestContext::new().await;
    assert_eq!(
        ctx.send(get("/health/ready", None)).await.status(),
        StatusCode::OK
    );

    ctx.memory.set_offline(true);
    assert_eq!(
        ctx.send(get("/health/ready", None)).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let ctx = TestContext::new().await;

    for path in ["/login", "/health", "/dashboard"] {
        let response = ctx.send(get(path, None)).await;
        let headers = response.headers();
        assert_eq!(headers["x-frame-options"], "DENY", "{path}");
        assert_eq!(headers["x-content-type-options"], "nosniff", "{path}");
        assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY), "{path}");
        assert!(headers.contains_key("x-request-id"), "{path}");
    }
}

#[tokio::test]
async fn test_static_assets_are_public() {
    let ctx = TestContext::new().await;
    let response = ctx.send(get("/static/admin.css", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
