//! Signed session cookies for admin.
//!
//! A session is two cookies:
//!
//! - `uid`: `<admin id>.<expiry unix seconds>.<hex HMAC-SHA256>`
//! - `email`: the admin's email address
//!
//! The MAC covers the id, the email and the expiry under
//! `ADMIN_SESSION_SECRET`, so neither cookie can be edited on its own.
//! Cookies are `HttpOnly`, `SameSite=Strict`, `Path=/`, and `Secure` when the
//! dashboard is served over HTTPS.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, SET_COOKIE},
};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

use spot_my_ride_core::{AdminId, Email};

/// Cookie holding the signed session token.
pub const UID_COOKIE: &str = "uid";

/// Cookie holding the admin's email.
pub const EMAIL_COOKIE: &str = "email";

/// Session lifetime with "remember me".
pub const REMEMBER_ME_DAYS: i64 = 7;

/// Session lifetime without "remember me".
pub const DEFAULT_SESSION_DAYS: i64 = 1;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Reasons a session token is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("malformed session token")]
    Malformed,

    #[error("session expired")]
    Expired,

    #[error("session signature mismatch")]
    BadSignature,
}

/// Issues and verifies session tokens.
pub struct SessionSigner {
    secret: SecretString,
}

impl SessionSigner {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        Self {
            secret: SecretString::from(secret.expose_secret().to_owned()),
        }
    }

    fn mac(&self, id: &str, email: &str, expires_at: i64) -> Hmac<Sha256> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(id.as_bytes());
        mac.update(b"\n");
        mac.update(email.as_bytes());
        mac.update(b"\n");
        mac.update(expires_at.to_string().as_bytes());
        mac
    }

    /// Build a token for `id` valid until `expires_at` (unix seconds).
    #[must_use]
    pub fn issue(&self, id: &AdminId, email: &Email, expires_at: i64) -> String {
        let tag = self.mac(id.as_str(), email.as_str(), expires_at).finalize();
        format!(
            "{}.{expires_at}.{}",
            id.as_str(),
            hex::encode(tag.into_bytes())
        )
    }

    /// Check a token against the email cookie at time `now`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the token is malformed, expired, or its
    /// signature does not match.
    pub fn verify(&self, token: &str, email: &str, now: i64) -> Result<AdminId, SessionError> {
        // Ids may contain dots, so split from the right.
        let mut parts = token.rsplitn(3, '.');
        let (Some(tag), Some(expiry), Some(id)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SessionError::Malformed);
        };
        if id.is_empty() {
            return Err(SessionError::Malformed);
        }

        let expires_at: i64 = expiry.parse().map_err(|_| SessionError::Malformed)?;
        let tag = hex::decode(tag).map_err(|_| SessionError::Malformed)?;

        // Constant-time comparison
        self.mac(id, email, expires_at)
            .verify_slice(&tag)
            .map_err(|_| SessionError::BadSignature)?;

        if expires_at <= now {
            return Err(SessionError::Expired);
        }

        Ok(AdminId::new(id))
    }
}

/// Session length in days for the "remember me" choice.
#[must_use]
pub const fn session_days(remember: bool) -> i64 {
    if remember {
        REMEMBER_ME_DAYS
    } else {
        DEFAULT_SESSION_DAYS
    }
}

/// Expiry timestamp for a session starting at `now`.
#[must_use]
pub const fn session_expiry(now: i64, remember: bool) -> i64 {
    now + session_days(remember) * SECONDS_PER_DAY
}

fn session_cookie(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// The `uid` and `email` cookies for a fresh session.
#[must_use]
pub fn session_cookies(token: String, email: &Email, remember: bool, secure: bool) -> [Cookie<'static>; 2] {
    let max_age = Duration::days(session_days(remember));
    [
        session_cookie(UID_COOKIE, token, max_age, secure),
        session_cookie(EMAIL_COOKIE, email.as_str().to_owned(), max_age, secure),
    ]
}

/// Cookies that delete both session cookies.
#[must_use]
pub fn clear_session_cookies(secure: bool) -> [Cookie<'static>; 2] {
    [
        session_cookie(UID_COOKIE, String::new(), Duration::ZERO, secure),
        session_cookie(EMAIL_COOKIE, String::new(), Duration::ZERO, secure),
    ]
}

/// Append `Set-Cookie` headers.
pub fn append_cookies(headers: &mut HeaderMap, cookies: &[Cookie<'static>]) {
    for cookie in cookies {
        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            headers.append(SET_COOKIE, value);
        }
    }
}

/// Read one cookie from the request's `Cookie` headers.
#[must_use]
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| Cookie::parse(pair.trim()).ok())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new(&SecretString::from("k3y-for-tests-Zq8pL2vN7xR4tW9mB6cJ".to_string()))
    }

    fn email() -> Email {
        Email::parse("ops@spotmyride.app").unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let token = signer().issue(&AdminId::new("a1"), &email(), 2_000);
        let id = signer().verify(&token, "ops@spotmyride.app", 1_000).unwrap();
        assert_eq!(id.as_str(), "a1");
    }

    #[test]
    fn test_id_with_dots() {
        let token = signer().issue(&AdminId::new("a.b.c"), &email(), 2_000);
        let id = signer().verify(&token, "ops@spotmyride.app", 1_000).unwrap();
        assert_eq!(id.as_str(), "a.b.c");
    }

    #[test]
    fn test_expired() {
        let token = signer().issue(&AdminId::new("a1"), &email(), 1_000);
        assert_eq!(
            signer().verify(&token, "ops@spotmyride.app", 1_000),
            Err(SessionError::Expired)
        );
    }

    #[test]
    fn test_tampering_is_rejected() {
        let token = signer().issue(&AdminId::new("a1"), &email(), 2_000);

        assert_eq!(
            signer().verify(&token, "other@spotmyride.app", 1_000),
            Err(SessionError::BadSignature)
        );

        let forged = token.replacen("a1", "a2", 1);
        assert_eq!(
            signer().verify(&forged, "ops@spotmyride.app", 1_000),
            Err(SessionError::BadSignature)
        );

        let extended = token.replacen("2000", "9000", 1);
        assert_eq!(
            signer().verify(&extended, "ops@spotmyride.app", 1_000),
            Err(SessionError::BadSignature)
        );
    }

    #[test]
    fn test_malformed() {
        for token in ["", "a1", "a1.2000", ".2000.abcd", "a1.soon.abcd", "a1.2000.zz"] {
            assert_eq!(
                signer().verify(token, "ops@spotmyride.app", 1_000),
                Err(SessionError::Malformed),
                "{token}"
            );
        }
    }

    #[test]
    fn test_cookie_attributes() {
        let [uid, mail] = session_cookies("tok".to_string(), &email(), true, true);
        let rendered = uid.to_string();
        assert!(rendered.starts_with("uid=tok"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=604800"));
        assert_eq!(mail.value(), "ops@spotmyride.app");

        let [short, _] = session_cookies("tok".to_string(), &email(), false, false);
        let rendered = short.to_string();
        assert!(rendered.contains("Max-Age=86400"));
        assert!(!rendered.contains("Secure"));
    }

    #[test]
    fn test_clear_cookies_expire_immediately() {
        let [uid, mail] = clear_session_cookies(false);
        assert!(uid.to_string().contains("Max-Age=0"));
        assert_eq!(mail.name(), EMAIL_COOKIE);
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; uid=a1.2000.ff; email="));
        assert_eq!(read_cookie(&headers, UID_COOKIE).as_deref(), Some("a1.2000.ff"));
        assert_eq!(read_cookie(&headers, EMAIL_COOKIE), None);
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_session_expiry() {
        assert_eq!(session_expiry(0, true), 7 * 86_400);
        assert_eq!(session_expiry(0, false), 86_400);
    }
}
