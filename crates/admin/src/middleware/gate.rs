//! Login/dashboard boundary enforced before routing.
//!
//! Only the presence of the `uid` cookie is checked here. Token validity is
//! the job of [`RequireAdminAuth`](super::RequireAdminAuth), which clears the
//! cookies when it rejects one.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::session::{UID_COOKIE, read_cookie};

/// Path prefixes the gate never touches.
const EXEMPT_PREFIXES: &[&str] = &["/static", "/assets", "/api", "/health"];

/// Exact paths the gate never touches.
const EXEMPT_PATHS: &[&str] = &["/favicon.ico"];

const LOGIN_PATH: &str = "/login";
const DASHBOARD_PATH: &str = "/dashboard";

/// What the gate does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    RedirectToLogin,
    RedirectToDashboard,
}

/// Whether `path` bypasses the gate.
#[must_use]
pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PATHS.contains(&path)
        || EXEMPT_PREFIXES.iter().any(|prefix| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
}

/// Decide from the path and whether a `uid` cookie is present.
#[must_use]
pub fn gate_decision(path: &str, has_session: bool) -> GateDecision {
    if is_exempt(path) {
        return GateDecision::Pass;
    }
    match (path == LOGIN_PATH, has_session) {
        (false, false) => GateDecision::RedirectToLogin,
        (true, true) => GateDecision::RedirectToDashboard,
        _ => GateDecision::Pass,
    }
}

/// Middleware applying [`gate_decision`] to every request.
pub async fn session_gate_middleware(request: Request, next: Next) -> Response {
    let has_session = read_cookie(request.headers(), UID_COOKIE).is_some();

    match gate_decision(request.uri().path(), has_session) {
        GateDecision::Pass => next.run(request).await,
        GateDecision::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
        GateDecision::RedirectToDashboard => Redirect::to(DASHBOARD_PATH).into_response(),
    }
}
