use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::debug;

use serene_types::api::RecordMoodRequest;
use serene_types::models::{MoodEntry, NewMoodEntry};
use serene_types::moods::{self, MOODS, Mood};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

pub async fn list_moods() -> Json<&'static [Mood]> {
    Json(MOODS)
}

pub async fn record_mood(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<RecordMoodRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|e| {
        debug!("Rejected mood body: {}", e);
        ApiError::validation("Invalid request data")
    })?;

    // Ids outside the catalog are kept as-is.
    if moods::find(&req.mood).is_none() {
        debug!("User {} recorded uncatalogued mood '{}'", current.user.id, req.mood);
    }

    let entry = NewMoodEntry {
        user_id: current.user.id,
        mood: req.mood,
        notes: req.notes,
        timestamp: Utc::now(),
    };
    let entry = state.run_store(move |store| store.create_mood_entry(entry)).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn list_mood_entries(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<MoodEntry>>, ApiError> {
    let user_id = current.user.id;
    let entries = state.run_store(move |store| store.list_mood_entries(user_id)).await?;
    Ok(Json(entries))
}
