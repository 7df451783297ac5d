//! Admin session
//!
//! Holds the backend bearer token in the key-value store. The token is a JWT;
//! its `exp` claim is read (not verified) so stale tokens are not sent.

use crate::domain::repositories::KeyValueStore;
use crate::shared::constants::ADMIN_TOKEN_STORAGE_KEY;
use crate::shared::error::AdminError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

#[derive(Clone)]
pub struct AdminSession {
    backend: Arc<dyn KeyValueStore>,
}

impl AdminSession {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Raw stored token, expired or not.
    pub fn token(&self) -> Option<String> {
        match self.backend.get(ADMIN_TOKEN_STORAGE_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                log::warn!("Could not read admin session: {}", e);
                None
            }
        }
    }

    pub fn set_token(&self, token: &str) -> Result<(), AdminError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AdminError::validation("Empty session token"));
        }
        self.backend.set(ADMIN_TOKEN_STORAGE_KEY, token)
    }

    pub fn clear(&self) {
        if let Err(e) = self.backend.remove(ADMIN_TOKEN_STORAGE_KEY) {
            log::warn!("Could not clear admin session: {}", e);
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    /// Token to send as `Authorization: Bearer`, if present and not expired.
    pub fn bearer(&self) -> Option<String> {
        let token = self.token()?;
        if is_expired(&token, Utc::now()) {
            log::debug!("Stored admin token has expired");
            return None;
        }
        Some(token)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token().and_then(|token| expiry(&token))
    }
}

fn claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// `exp` claim of a JWT, if it can be read.
pub fn expiry(token: &str) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(claims(token)?.exp?, 0)
}

/// Undecodable tokens count as expired; tokens without `exp` never expire.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    match claims(token) {
        Some(Claims { exp: Some(exp) }) => exp <= now.timestamp(),
        Some(Claims { exp: None }) => false,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_expiry_detection() {
        let now = Utc::now();
        let live = jwt(&format!(r#"{{"exp":{}}}"#, now.timestamp() + 3600));
        let stale = jwt(&format!(r#"{{"exp":{}}}"#, now.timestamp() - 10));
        assert!(!is_expired(&live, now));
        assert!(is_expired(&stale, now));
        assert!(!is_expired(&jwt(r#"{"sub":"admin"}"#), now));
        assert!(is_expired("garbage", now));
        assert!(is_expired("a.!!!.c", now));
    }

    #[test]
    fn test_session_lifecycle() {
        let session = AdminSession::new(Arc::new(MemoryStore::new()));
        assert!(!session.is_authenticated());
        assert!(session.set_token("  ").is_err());

        let token = jwt(&format!(r#"{{"exp":{}}}"#, Utc::now().timestamp() + 60));
        session.set_token(&token).unwrap();
        assert_eq!(session.bearer(), Some(token));
        assert!(session.expires_at().is_some());

        session.clear();
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_expired_token_is_not_sent() {
        let session = AdminSession::new(Arc::new(MemoryStore::new()));
        let token = jwt(r#"{"exp":1000}"#);
        session.set_token(&token).unwrap();
        assert_eq!(session.token(), Some(token));
        assert_eq!(session.bearer(), None);
    }
}
