//! Authentication extractor for admin.
//!
//! Every protected handler takes [`RequireAdminAuth`]. The extractor verifies
//! the signed `uid` cookie, then re-reads the admin document so a deleted or
//! re-addressed credential ends the session immediately.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::db::AdminUserRepository;
use crate::error::set_sentry_user;
use crate::models::CurrentAdmin;
use crate::state::AppState;

use super::session::{EMAIL_COOKIE, UID_COOKIE, append_cookies, clear_session_cookies, read_cookie};

/// Extractor that requires admin authentication.
///
/// If the admin is not logged in, returns a redirect to the login page
/// for HTML requests, or 401 Unauthorized for API requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication is required but not present.
///
/// Both session cookies are cleared on the way out, so a stale cookie cannot
/// bounce the browser between `/login` and `/dashboard`.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin { secure: bool },
    /// Unauthorized response (for API requests).
    Unauthorized { secure: bool },
    /// The credential store could not be read; the session is kept.
    Unavailable,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        let (mut response, secure) = match self {
            Self::RedirectToLogin { secure } => (Redirect::to("/login").into_response(), secure),
            Self::Unauthorized { secure } => (StatusCode::UNAUTHORIZED.into_response(), secure),
            Self::Unavailable => {
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable",
                )
                    .into_response();
            }
        };

        append_cookies(response.headers_mut(), &clear_session_cookies(secure));
        response
    }
}

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secure = state.config().secure_cookies();
        let reject = || {
            if parts.uri.path().starts_with("/api/") {
                AdminAuthRejection::Unauthorized { secure }
            } else {
                AdminAuthRejection::RedirectToLogin { secure }
            }
        };

        let (Some(token), Some(email)) = (
            read_cookie(&parts.headers, UID_COOKIE),
            read_cookie(&parts.headers, EMAIL_COOKIE),
        ) else {
            return Err(reject());
        };

        let admin_id = state
            .sessions()
            .verify(&token, &email, Utc::now().timestamp())
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected session token");
                reject()
            })?;

        let admin = AdminUserRepository::new(state.store())
            .get_by_id(&admin_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, admin_id = %admin_id, "Failed to load admin for session");
                AdminAuthRejection::Unavailable
            })?
            .ok_or_else(|| {
                tracing::warn!(admin_id = %admin_id, "Session refers to a missing admin");
                reject()
            })?;

        if admin.email.as_str() != email {
            tracing::warn!(admin_id = %admin_id, "Session email no longer matches admin");
            return Err(reject());
        }

        set_sentry_user(&admin.id, Some(admin.email.as_str()));
        Ok(Self(CurrentAdmin::from(&admin)))
    }
}
