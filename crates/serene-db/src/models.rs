//! Database row types. These map directly to SQLite rows and are converted
//! into the shared `serene-types` models at the edge of the query layer.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use serene_types::models::{ChatMessage, MoodEntry, User};

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
}

pub struct MoodEntryRow {
    pub id: i64,
    pub user_id: i64,
    pub mood: String,
    pub notes: Option<String>,
    pub timestamp: String,
}

pub struct ChatMessageRow {
    pub id: i64,
    pub user_id: i64,
    pub sender: String,
    pub message: String,
    pub sentiment: Option<String>,
    pub suggestions: Option<String>,
    pub timestamp: String,
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("Corrupt timestamp '{}'", raw))
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            created_at: parse_timestamp(&row.created_at)?,
            id: row.id,
            username: row.username,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
        })
    }
}

impl TryFrom<MoodEntryRow> for MoodEntry {
    type Error = anyhow::Error;

    fn try_from(row: MoodEntryRow) -> Result<Self> {
        Ok(MoodEntry {
            timestamp: parse_timestamp(&row.timestamp)?,
            id: row.id,
            user_id: row.user_id,
            mood: row.mood,
            notes: row.notes,
        })
    }
}

impl TryFrom<ChatMessageRow> for ChatMessage {
    type Error = anyhow::Error;

    fn try_from(row: ChatMessageRow) -> Result<Self> {
        let sender = row
            .sender
            .parse()
            .with_context(|| format!("Corrupt sender on chat message {}", row.id))?;
        let sentiment = row
            .sentiment
            .as_deref()
            .map(str::parse)
            .transpose()
            .with_context(|| format!("Corrupt sentiment on chat message {}", row.id))?;
        let suggestions = row
            .suggestions
            .as_deref()
            .map(serde_json::from_str::<Vec<String>>)
            .transpose()
            .with_context(|| format!("Corrupt suggestions on chat message {}", row.id))?;

        Ok(ChatMessage {
            timestamp: parse_timestamp(&row.timestamp)?,
            id: row.id,
            user_id: row.user_id,
            sender,
            message: row.message,
            sentiment,
            suggestions,
        })
    }
}
