use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};
use crate::chat;
use crate::middleware::require_auth;
use crate::moods;

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/moods", get(moods::list_moods))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/user", get(auth::current_user))
        .route(
            "/api/mood-entries",
            get(moods::list_mood_entries).post(moods::record_mood),
        )
        .route("/api/chat/messages", get(chat::get_messages))
        .route("/api/chat", post(chat::send_message))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
