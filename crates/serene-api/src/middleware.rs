use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;
use uuid::Uuid;

use serene_types::models::User;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::session::{self, SESSION_COOKIE};

/// The authenticated caller, attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session_id: Uuid,
}

/// Resolve the session cookie to a user, or reject with an empty 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current = authenticate(&state, req.headers())
        .await?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// `Ok(None)` covers every flavour of "not logged in": no cookie, bad
/// signature, expired token, unknown session, or a user that no longer exists.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Option<CurrentUser>, ApiError> {
    let jar = CookieJar::from_headers(headers);
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    let Some(claims) = session::decode_token(&state.session_secret, cookie.value()) else {
        debug!("Rejected session cookie with bad signature or expiry");
        return Ok(None);
    };

    if state.sessions.user_for(&claims.sid).await != Some(claims.sub) {
        debug!("Session {} is not active", claims.sid);
        return Ok(None);
    }

    let user_id = claims.sub;
    let user = state.run_store(move |store| store.get_user(user_id)).await?;

    Ok(user.map(|user| CurrentUser {
        user,
        session_id: claims.sid,
    }))
}
