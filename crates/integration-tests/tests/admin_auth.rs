//! Login, logout and the session gate.

use axum::http::{StatusCode, header};
use spot_my_ride_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, TestContext, body_text, cookie_header, form_request, get,
    location, login_body,
};

#[tokio::test]
async fn test_protected_pages_redirect_to_login_without_session() {
    let ctx = TestContext::new().await;

    for path in ["/", "/dashboard", "/user", "/user/u1", "/notification"] {
        let response = ctx.send(get(path, None)).await;
        assert!(response.status().is_redirection(), "{path}");
        assert_eq!(location(&response), "/login", "{path}");
    }
}

#[tokio::test]
async fn test_login_page_redirects_to_dashboard_with_session() {
    let ctx = TestContext::new().await;
    let cookie = ctx.login().await;

    let response = ctx.send(get("/login", Some(&cookie))).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(form_request(
            "/login",
            None,
            &format!("{}&remember=on", login_body(ADMIN_EMAIL, ADMIN_PASSWORD)),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let set_cookies: Vec<&str> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert_eq!(set_cookies.len(), 2);
    assert!(set_cookies.iter().any(|c| c.starts_with("uid=")));
    assert!(
        set_cookies
            .iter()
            .any(|c| c.starts_with("email=ops@spotmyride.app"))
    );
    for cookie in &set_cookies {
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=604800"));
    }
}

#[tokio::test]
async fn test_session_grants_access_to_dashboard() {
    let ctx = TestContext::new().await;
    ctx.seed_account("u1", "Ali Khan", "5550100", None).await;
    let cookie = ctx.login().await;

    let response = ctx.send(get("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Total Users"));
    assert!(body.contains(ADMIN_EMAIL));
}

#[tokio::test]
async fn test_wrong_password_rerenders_login() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(form_request(
            "/login",
            None,
            &login_body(ADMIN_EMAIL, "not-the-password"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = body_text(response).await;
    assert!(body.contains("Invalid email or password"));
    assert!(body.contains(ADMIN_EMAIL));
}

#[tokio::test]
async fn test_unknown_admin_gets_same_message() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(form_request(
            "/login",
            None,
            &login_body("nobody@spotmyride.app", ADMIN_PASSWORD),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(response).await.contains("Invalid email or password"));
}

#[tokio::test]
async fn test_malformed_form_is_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(form_request("/login", None, &login_body("not-an-email", "")))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_outage_reports_unavailable() {
    let ctx = TestContext::new().await;
    ctx.memory.set_offline(true);

    let response = ctx
        .send(form_request(
            "/login",
            None,
            &login_body(ADMIN_EMAIL, ADMIN_PASSWORD),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_text(response).await;
    assert!(body.contains("Sign-in is temporarily unavailable"));
    assert!(!body.contains("Invalid email or password"));
}

#[tokio::test]
async fn test_forged_session_is_cleared() {
    let ctx = TestContext::new().await;
    let cookie = "uid=someone.9999999999.deadbeef; email=ops@spotmyride.app";

    let response = ctx.send(get("/dashboard", Some(cookie))).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    let cleared = cookie_header(&response);
    assert_eq!(cleared, "uid=; email=");
}

#[tokio::test]
async fn test_session_for_other_email_is_rejected() {
    let ctx = TestContext::new().await;
    let cookie = ctx.login().await;
    let swapped = cookie.replace("email=ops@spotmyride.app", "email=eve@spotmyride.app");

    let response = ctx.send(get("/dashboard", Some(&swapped))).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let ctx = TestContext::new().await;
    let cookie = ctx.login().await;

    let response = ctx.send(form_request("/logout", Some(&cookie), "")).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    let set_cookies: Vec<&str> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert_eq!(set_cookies.len(), 2);
    assert!(set_cookies.iter().all(|c| c.contains("Max-Age=0")));
}
