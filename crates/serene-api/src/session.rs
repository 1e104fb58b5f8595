//! Server-side session registry and the signed cookie that points into it.
//!
//! The cookie holds an HS256 JWT naming the user and a session id. A token is
//! only honoured while its session id is still registered, so logout takes
//! effect immediately even though the JWT itself has not expired.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "serene.sid";
pub const SESSION_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    /// Session id in the registry.
    pub sid: Uuid,
    pub exp: usize,
}

#[derive(Debug, Clone, Copy)]
struct Session {
    user_id: i64,
    expires_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session for `user_id`. Expired sessions are dropped on the way.
    pub async fn create(&self, user_id: i64) -> (Uuid, DateTime<Utc>) {
        let now = Utc::now();
        let sid = Uuid::new_v4();
        let expires_at = now + Duration::days(SESSION_TTL_DAYS);

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(sid, Session { user_id, expires_at });
        (sid, expires_at)
    }

    /// The user a live session belongs to.
    pub async fn user_for(&self, sid: &Uuid) -> Option<i64> {
        let sessions = self.sessions.read().await;
        sessions
            .get(sid)
            .filter(|s| s.expires_at > Utc::now())
            .map(|s| s.user_id)
    }

    pub async fn remove(&self, sid: &Uuid) -> bool {
        self.sessions.write().await.remove(sid).is_some()
    }
}

pub fn issue_token(secret: &str, user_id: i64, sid: Uuid, expires_at: DateTime<Utc>) -> Result<String> {
    let claims = Claims {
        sub: user_id,
        sid,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Signature and expiry check only; the caller still has to consult the registry.
pub fn decode_token(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Matches the attributes `remove` needs to overwrite the live cookie.
pub fn expired_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sessions_live_until_removed() {
        let store = SessionStore::new();
        let (sid, _) = store.create(7).await;

        assert_eq!(store.user_for(&sid).await, Some(7));
        assert!(store.remove(&sid).await);
        assert_eq!(store.user_for(&sid).await, None);
        assert!(!store.remove(&sid).await);
    }

    #[tokio::test]
    async fn unknown_session_has_no_user() {
        let store = SessionStore::new();
        let (sid, _) = store.create(1).await;
        assert_eq!(store.user_for(&Uuid::new_v4()).await, None);
        assert!(!store.remove(&Uuid::new_v4()).await);
        assert_eq!(store.user_for(&sid).await, Some(1));
    }

    #[test]
    fn token_round_trips_with_the_right_secret() {
        let sid = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::days(1);
        let token = issue_token("secret-a", 3, sid, expires_at).unwrap();

        let claims = decode_token("secret-a", &token).unwrap();
        assert_eq!(claims.sub, 3);
        assert_eq!(claims.sid, sid);

        assert!(decode_token("secret-b", &token).is_none());
        assert!(decode_token("secret-a", "not.a.jwt").is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token("secret", 3, Uuid::new_v4(), Utc::now() - Duration::days(2)).unwrap();
        assert!(decode_token("secret", &token).is_none());
    }

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("tok".into(), true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
