use serde::{Deserialize, Serialize};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// -- Moods --

#[derive(Debug, Deserialize)]
pub struct RecordMoodRequest {
    pub mood: String,
    #[serde(default)]
    pub notes: Option<String>,
}

// -- Chat --

#[derive(Debug, Deserialize)]
pub struct SendChatRequest {
    pub message: String,
}

// -- Errors --

/// Body of every non-empty error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
