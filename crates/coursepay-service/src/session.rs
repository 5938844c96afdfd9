//! Cookie-backed sessions.
//!
//! The whole session lives client-side in one cookie holding an HS256 token
//! signed with the configured secret. It carries the logged-in user (if any)
//! and pending flash messages. A missing, tampered or expired cookie reads as
//! an empty session.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use coursepay_core::{User, UserId};

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "coursepay_session";

/// Errors producing a session cookie.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Token signing failed.
    #[error("session encoding failed: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),

    /// The token contained bytes not allowed in a header.
    #[error("invalid session cookie value")]
    InvalidHeader(#[from] axum::http::header::InvalidHeaderValue),
}

/// Per-request session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uid: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    flashes: Vec<String>,
}

impl Session {
    /// The logged-in user's id.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.uid
    }

    /// The logged-in user's name.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Record a successful login.
    pub fn log_in(&mut self, user: &User) {
        self.uid = Some(user.id);
        self.username = Some(user.username.clone());
    }

    /// Drop everything, including pending flashes.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Queue a message for the next rendered page.
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flashes.push(message.into());
    }

    /// Remove and return the pending flash messages.
    pub fn take_flashes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.flashes)
    }

    fn is_empty(&self) -> bool {
        self.uid.is_none() && self.username.is_none() && self.flashes.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    session: Session,
    exp: u64,
}

/// Signing keys and lifetime for session cookies.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    /// Build keys from a shared secret.
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Sign a session into a token.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn encode(&self, session: &Session) -> Result<String, SessionError> {
        let claims = Claims {
            session: session.clone(),
            exp: unix_now() + self.ttl.as_secs(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify a token and return its session, or `None` if it is invalid.
    #[must_use]
    pub fn decode(&self, token: &str) -> Option<Session> {
        let validation = Validation::new(Algorithm::HS256);
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Some(data.claims.session),
            Err(e) => {
                tracing::debug!(error = %e, "Discarding invalid session cookie");
                None
            }
        }
    }

    /// `Set-Cookie` value persisting this session.
    ///
    /// An empty session expires the cookie instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be signed.
    pub fn set_cookie(&self, session: &Session) -> Result<HeaderValue, SessionError> {
        let value = if session.is_empty() {
            format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
        } else {
            format!(
                "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
                self.encode(session)?,
                self.ttl.as_secs()
            )
        };
        Ok(HeaderValue::from_str(&value)?)
    }

    /// Read the session from request headers.
    #[must_use]
    pub fn read(&self, headers: &HeaderMap) -> Session {
        cookie_value(headers, SESSION_COOKIE)
            .and_then(|token| self.decode(token))
            .unwrap_or_default()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Find a cookie by name across all `Cookie` headers.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(state.sessions.read(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::new("test-secret", Duration::from_secs(3600))
    }

    fn logged_in() -> Session {
        let user = User::with_cost("asha", "asha@example.com", "pw", 4).unwrap();
        let mut session = Session::default();
        session.log_in(&user);
        session
    }

    #[test]
    fn encode_decode() {
        let mut session = logged_in();
        session.flash("Logged in successfully!");

        let token = keys().encode(&session).unwrap();
        assert_eq!(keys().decode(&token), Some(session));
    }

    #[test]
    fn wrong_secret_reads_as_none() {
        let token = keys().encode(&logged_in()).unwrap();
        let other = SessionKeys::new("other-secret", Duration::from_secs(3600));
        assert_eq!(other.decode(&token), None);
        assert_eq!(keys().decode("garbage"), None);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let claims = Claims {
            session: logged_in(),
            exp: unix_now() - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert_eq!(keys().decode(&token), None);
    }

    #[test]
    fn flashes_are_consumed_once() {
        let mut session = Session::default();
        session.flash("one");
        session.flash("two");
        assert_eq!(session.take_flashes(), vec!["one", "two"]);
        assert!(session.take_flashes().is_empty());
    }

    #[test]
    fn empty_session_expires_cookie() {
        let value = keys().set_cookie(&Session::default()).unwrap();
        let value = value.to_str().unwrap();
        assert!(value.starts_with("coursepay_session=;"));
        assert!(value.contains("Max-Age=0"));
    }

    #[test]
    fn reads_cookie_among_others() {
        let token = keys().encode(&logged_in()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={token}; lang=en"))
                .unwrap(),
        );

        let session = keys().read(&headers);
        assert_eq!(session.username(), Some("asha"));
        assert!(session.user_id().is_some());
    }

    #[test]
    fn clear_drops_user() {
        let mut session = logged_in();
        session.clear();
        assert!(session.user_id().is_none());
        assert!(session.is_empty());
    }
}
