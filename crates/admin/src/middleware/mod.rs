//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//! 5. Session gate (login/dashboard boundary on cookie presence)
//!
//! Handlers that need the signed-in admin take [`RequireAdminAuth`].

pub mod auth;
pub mod gate;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{AdminAuthRejection, RequireAdminAuth};
pub use gate::{GateDecision, gate_decision, session_gate_middleware};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SessionError, SessionSigner};
