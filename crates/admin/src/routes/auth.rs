//! Authentication route handlers for admin.
//!
//! Email + password login. A successful login sets the signed `uid` cookie
//! and the `email` cookie; logout clears both.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use crate::error::clear_sentry_user;
use crate::filters;
use crate::middleware::session::{
    append_cookies, clear_session_cookies, session_cookies, session_expiry,
};
use crate::services::auth::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

use super::FlashParams;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub email: String,
    pub remember: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Submitted login form.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Checkbox; present only when ticked.
    pub remember: Option<String>,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("remember", &self.remember.is_some())
            .finish()
    }
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

fn render(template: &LoginPageTemplate) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Render the login page.
///
/// GET /login
async fn login_page(Query(flash): Query<FlashParams>) -> Html<String> {
    render(&LoginPageTemplate {
        email: String::new(),
        remember: false,
        error: flash.error,
        success: flash.success,
    })
}

/// Verify credentials and start a session.
///
/// POST /login
#[instrument(skip(state, form), fields(email = %form.email))]
async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let remember = form.remember.is_some();
    let auth = AdminAuthService::new(state.store());

    let admin = match auth.login(&form.email, &form.password).await {
        Ok(admin) => admin,
        Err(e) => {
            let status = match &e {
                AdminAuthError::Unavailable(inner) => {
                    tracing::error!(error = %inner, "Credential lookup failed");
                    StatusCode::SERVICE_UNAVAILABLE
                }
                AdminAuthError::InvalidCredentials | AdminAuthError::LegacyPassword => {
                    tracing::info!("Login rejected");
                    StatusCode::UNAUTHORIZED
                }
                _ => StatusCode::BAD_REQUEST,
            };
            let page = render(&LoginPageTemplate {
                email: form.email.trim().to_owned(),
                remember,
                error: Some(e.user_message()),
                success: None,
            });
            return (status, page).into_response();
        }
    };

    let expires_at = session_expiry(Utc::now().timestamp(), remember);
    let token = state.sessions().issue(&admin.id, &admin.email, expires_at);
    let cookies = session_cookies(
        token,
        &admin.email,
        remember,
        state.config().secure_cookies(),
    );

    let mut response = Redirect::to("/dashboard").into_response();
    append_cookies(response.headers_mut(), &cookies);
    response
}

/// Logout and clear session cookies.
///
/// POST /logout
async fn logout(State(state): State<AppState>) -> Response {
    clear_sentry_user();

    let mut response = Redirect::to("/login").into_response();
    append_cookies(
        response.headers_mut(),
        &clear_session_cookies(state.config().secure_cookies()),
    );
    response
}
