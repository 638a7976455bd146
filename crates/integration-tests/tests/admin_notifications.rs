//! Broadcast compose, fan-out and history.

use axum::http::StatusCode;
use spot_my_ride_admin::store::collections;
use spot_my_ride_integration_tests::{
    PushStub, TestContext, body_text, form_request, get, location,
};

fn broadcast_body(kind: &str, title: &str, message: &str) -> String {
    format!(
        "kind={}&title={}&message={}",
        urlencoding::encode(kind),
        urlencoding::encode(title),
        urlencoding::encode(message)
    )
}

async fn seed_three(ctx: &TestContext) {
    ctx.seed_account("u1", "Ali Khan", "5550100", Some("tok-1"))
        .await;
    ctx.seed_account("u2", "Dana Smith", "4440200", Some("tok-2"))
        .await;
    ctx.seed_account("u3", "Sam Lee", "3330300", None).await;
}

#[tokio::test]
async fn test_email_broadcast_writes_one_notification_per_user() {
    let ctx = TestContext::new().await;
    seed_three(&ctx).await;
    let cookie = ctx.login().await;

    let response = ctx
        .send(form_request(
            "/notification",
            Some(&cookie),
            &broadcast_body("Email", "Street sweeping", "Move your car by 8am"),
        ))
        .await;

    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/notification?success="));
    assert_eq!(ctx.memory.count(collections::NOTIFICATIONS).await, 3);
}

#[tokio::test]
async fn test_email_broadcast_never_calls_push_endpoint() {
    let stub = PushStub::start().await;
    let ctx = TestContext::with_push(stub.endpoint.clone()).await;
    seed_three(&ctx).await;
    let cookie = ctx.login().await;

    let response = ctx
        .send(form_request(
            "/notification",
            Some(&cookie),
            &broadcast_body("Email", "Street sweeping", "Move your car by 8am"),
        ))
        .await;

    assert!(location(&response).starts_with("/notification?success="));
    assert_eq!(ctx.memory.count(collections::NOTIFICATIONS).await, 3);
    assert!(stub.payloads().is_empty());
}

#[tokio::test]
async fn test_history_groups_one_broadcast_into_one_row() {
    let ctx = TestContext::new().await;
    seed_three(&ctx).await;
    let cookie = ctx.login().await;

    ctx.send(form_request(
        "/notification",
        Some(&cookie),
        &broadcast_body("Email", "Street sweeping", "Move your car by 8am"),
    ))
    .await;

    let body = body_text(ctx.send(get("/notification", Some(&cookie))).await).await;
    assert_eq!(body.matches("<td>Street sweeping</td>").count(), 1);

    let filtered =
        body_text(ctx.send(get("/notification?q=zzz", Some(&cookie))).await).await;
    assert!(!filtered.contains("<td>Street sweeping</td>"));
}

#[tokio::test]
async fn test_push_broadcast_reaches_registered_devices() {
    let stub = PushStub::start().await;
    let ctx = TestContext::with_push(stub.endpoint.clone()).await;
    seed_three(&ctx).await;
    let cookie = ctx.login().await;

    let response = ctx
        .send(form_request(
            "/notification",
            Some(&cookie),
            &broadcast_body("Push", "Heads up", "Tow zone tonight"),
        ))
        .await;

    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/notification?success="));
    assert_eq!(ctx.memory.count(collections::NOTIFICATIONS).await, 3);

    let payloads = stub.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["title"], "Heads up");
    assert_eq!(payloads[0]["text"], "Tow zone tonight");
    let tokens: Vec<&str> = payloads[0]["users"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|u| u["deviceToken"].as_str())
        .collect();
    assert_eq!(tokens, vec!["tok-1", "tok-2"]);
}

#[tokio::test]
async fn test_push_without_endpoint_warns() {
    let ctx = TestContext::new().await;
    seed_three(&ctx).await;
    let cookie = ctx.login().await;

    let response = ctx
        .send(form_request(
            "/notification",
            Some(&cookie),
            &broadcast_body("Push", "Heads up", "Tow zone tonight"),
        ))
        .await;

    assert!(location(&response).starts_with("/notification?warning="));
    assert_eq!(ctx.memory.count(collections::NOTIFICATIONS).await, 3);
}

#[tokio::test]
async fn test_missing_title_rerenders_form() {
    let ctx = TestContext::new().await;
    seed_three(&ctx).await;
    let cookie = ctx.login().await;

    let response = ctx
        .send(form_request(
            "/notification",
            Some(&cookie),
            &broadcast_body("Email", "  ", "Keep this text"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Title is required"));
    assert!(body.contains("Keep this text"));
    assert_eq!(ctx.memory.count(collections::NOTIFICATIONS).await, 0);
}
