use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, error, info};

use serene_db::Storage;
use serene_types::api::{LoginRequest, RegisterRequest};
use serene_types::models::{NewUser, User};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::password;
use crate::session::{self, SessionStore};

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 32;
const MIN_PASSWORD_LEN: usize = 6;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn Storage>,
    pub sessions: SessionStore,
    pub session_secret: String,
    /// Mark the session cookie `Secure` (production deployments behind TLS).
    pub secure_cookies: bool,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn Storage>, session_secret: impl Into<String>, secure_cookies: bool) -> AppState {
        Arc::new(Self {
            store,
            sessions: SessionStore::new(),
            session_secret: session_secret.into(),
            secure_cookies,
        })
    }

    /// Run a storage call off the async runtime.
    pub async fn run_store<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn Storage) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal(e.into())
            })?
            .map_err(ApiError::Internal)
    }

    /// Open a session for `user` and wrap it in a cookie.
    async fn start_session(&self, jar: CookieJar, user: &User) -> Result<CookieJar, ApiError> {
        let (sid, expires_at) = self.sessions.create(user.id).await;
        let token = session::issue_token(&self.session_secret, user.id, sid, expires_at)?;
        Ok(jar.add(session::session_cookie(token, self.secure_cookies)))
    }
}

fn validate_registration(req: &RegisterRequest) -> Result<String, ApiError> {
    let username = req.username.trim();
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(ApiError::validation(format!(
            "Username must be between {} and {} characters",
            MIN_USERNAME_LEN, MAX_USERNAME_LEN
        )));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(username.to_string())
}

/// Empty optional fields from sign-up forms are treated as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|e| {
        debug!("Rejected register body: {}", e);
        ApiError::validation("Invalid request data")
    })?;
    let username = validate_registration(&req)?;

    // Check-then-insert; the store does not enforce uniqueness atomically.
    let user = state
        .run_store(move |store| {
            if store.get_user_by_username(&username)?.is_some() {
                return Ok(None);
            }

            let password = password::hash_password(&req.password)?;
            store
                .create_user(NewUser {
                    username,
                    password,
                    first_name: non_empty(req.first_name),
                    last_name: non_empty(req.last_name),
                    email: non_empty(req.email),
                })
                .map(Some)
        })
        .await?
        .ok_or(ApiError::UsernameTaken)?;

    info!("Registered user {} ({})", user.username, user.id);

    let jar = state.start_session(jar, &user).await?;
    Ok((StatusCode::CREATED, jar, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|e| {
        debug!("Rejected login body: {}", e);
        ApiError::validation("Invalid request data")
    })?;

    // Lookup and the slow hash verification both run on the blocking pool.
    let user = state
        .run_store(move |store| {
            let Some(user) = store.get_user_by_username(&req.username)? else {
                return Ok(None);
            };
            let ok = password::check_credentials(&user, &req.username, &req.password);
            Ok(ok.then_some(user))
        })
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    info!("User {} logged in", user.id);

    let jar = state.start_session(jar, &user).await?;
    Ok((jar, Json(user)))
}

/// Always succeeds; an anonymous caller just gets the cookie cleared.
/// Only the session registry is consulted, never the store.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let claims = jar
        .get(session::SESSION_COOKIE)
        .and_then(|cookie| session::decode_token(&state.session_secret, cookie.value()));

    if let Some(claims) = claims {
        if state.sessions.user_for(&claims.sid).await == Some(claims.sub) {
            state.sessions.remove(&claims.sid).await;
            info!("User {} logged out", claims.sub);
        }
    }

    (jar.remove(session::expired_cookie()), StatusCode::OK)
}

pub async fn current_user(Extension(current): Extension<CurrentUser>) -> Json<User> {
    Json(current.user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            first_name: None,
            last_name: None,
            email: None,
        }
    }

    #[test]
    fn registration_bounds() {
        assert_eq!(validate_registration(&request("  river ", "secret")).unwrap(), "river");
        assert!(validate_registration(&request("ab", "secret")).is_err());
        assert!(validate_registration(&request(&"x".repeat(33), "secret")).is_err());
        assert!(validate_registration(&request("river", "short")).is_err());
    }

    #[test]
    fn blank_optional_fields_are_dropped() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("Ada".into())), Some("Ada".into()));
        assert_eq!(non_empty(None), None);
    }
}
