//! User list, search, detail and suspend/activate.

use axum::http::StatusCode;
use serde_json::Value;
use spot_my_ride_admin::store::{DocumentStore, FieldsExt, collections};
use spot_my_ride_integration_tests::{TestContext, body_text, form_request, get, location};

async fn seeded() -> (TestContext, String) {
    let ctx = TestContext::new().await;
    ctx.seed_account("u1", "Ali Khan", "5550100", Some("tok-1")).await;
    ctx.seed_account("u2", "Dana Smith", "4440200", None).await;
    let cookie = ctx.login().await;
    (ctx, cookie)
}

#[tokio::test]
async fn test_user_list_shows_every_account() {
    let (ctx, cookie) = seeded().await;

    let response = ctx.send(get("/user", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Ali Khan"));
    assert!(body.contains("Dana Smith"));
    assert!(body.contains("/user/u1"));
}

#[tokio::test]
async fn test_search_by_phone() {
    let (ctx, cookie) = seeded().await;

    let response = ctx.send(get("/user?q=5550", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Ali Khan"));
    assert!(!body.contains("Dana Smith"));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let (ctx, cookie) = seeded().await;

    let body = body_text(ctx.send(get("/user?q=DANA", Some(&cookie))).await).await;
    assert!(body.contains("Dana Smith"));
    assert!(!body.contains("Ali Khan"));
}

#[tokio::test]
async fn test_malformed_page_falls_back_to_first_page() {
    let (ctx, cookie) = seeded().await;

    let response = ctx.send(get("/user?page=abc", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Ali Khan"));
}

#[tokio::test]
async fn test_user_detail() {
    let (ctx, cookie) = seeded().await;

    let response = ctx.send(get("/user/u1", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Ali Khan"));
    assert!(body.contains("5550100"));
    assert!(body.contains("Suspend user"));
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let (ctx, cookie) = seeded().await;

    let response = ctx.send(get("/user/missing", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_api_toggles_twice() {
    let (ctx, cookie) = seeded().await;

    let first = ctx
        .send(form_request("/api/users/u1/status", Some(&cookie), ""))
        .await;
    assert_eq!(first.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(first).await).unwrap();
    assert_eq!(json["active"], false);
    assert_eq!(json["status"], "Suspended");
    assert_eq!(json["message"], "User suspended successfully!");

    let doc = DocumentStore::Memory(ctx.memory.clone())
        .get(collections::USERS, "u1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.fields.bool_field("active"), Some(false));

    let second = ctx
        .send(form_request("/api/users/u1/status", Some(&cookie), ""))
        .await;
    let json: Value = serde_json::from_str(&body_text(second).await).unwrap();
    assert_eq!(json["active"], true);
    assert_eq!(json["message"], "User activated successfully!");
}

#[tokio::test]
async fn test_status_api_unknown_user() {
    let (ctx, cookie) = seeded().await;

    let response = ctx
        .send(form_request("/api/users/missing/status", Some(&cookie), ""))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["error"], "User not found");
}

#[tokio::test]
async fn test_status_api_requires_session() {
    let (ctx, _) = seeded().await;

    let response = ctx
        .send(form_request("/api/users/u1/status", None, ""))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_form_redirects_with_flash() {
    let (ctx, cookie) = seeded().await;

    let response = ctx
        .send(form_request("/user/u2/status", Some(&cookie), ""))
        .await;
    assert!(response.status().is_redirection());
    assert_eq!(
        location(&response),
        "/user/u2?success=User%20suspended%20successfully%21"
    );

    let body = body_text(ctx.send(get(&location(&response), Some(&cookie))).await).await;
    assert!(body.contains("User suspended successfully!"));
    assert!(body.contains("Activate user"));
}
