use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a user. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub mood: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMoodEntry {
    pub user_id: i64,
    pub mood: String,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

impl FromStr for Sender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "ai" => Ok(Self::Ai),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Label attached to every AI reply, chosen by keyword match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Stress,
    Sadness,
    Happiness,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stress => "stress",
            Self::Sadness => "sadness",
            Self::Happiness => "happiness",
            Self::Neutral => "neutral",
        }
    }
}

impl FromStr for Sentiment {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stress" => Ok(Self::Stress),
            "sadness" => Ok(Self::Sadness),
            "happiness" => Ok(Self::Happiness),
            "neutral" => Ok(Self::Neutral),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: i64,
    pub sender: Sender,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

/// A chat record before the store has assigned it an id.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub user_id: i64,
    pub sender: Sender,
    pub message: String,
    pub sentiment: Option<Sentiment>,
    pub suggestions: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl NewChatMessage {
    pub fn from_user(user_id: i64, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id,
            sender: Sender::User,
            message: message.into(),
            sentiment: None,
            suggestions: None,
            timestamp,
        }
    }

    pub fn from_ai(
        user_id: i64,
        message: impl Into<String>,
        sentiment: Sentiment,
        suggestions: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            sender: Sender::Ai,
            message: message.into(),
            sentiment: Some(sentiment),
            suggestions: Some(suggestions),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_json_hides_password_and_uses_camel_case() {
        let user = User {
            id: 7,
            username: "river".into(),
            password: "$argon2id$v=19$secret".into(),
            first_name: Some("River".into()),
            last_name: None,
            email: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["firstName"], "River");
        assert!(json.get("password").is_none());
        assert!(json.get("lastName").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn chat_enums_use_lowercase_tags() {
        let msg = NewChatMessage::from_ai(1, "hi", Sentiment::Happiness, vec![], Utc::now());
        assert_eq!(serde_json::to_value(msg.sender).unwrap(), "ai");
        assert_eq!(serde_json::to_value(Sentiment::Stress).unwrap(), "stress");
        assert_eq!("sadness".parse::<Sentiment>(), Ok(Sentiment::Sadness));
        assert!("angry".parse::<Sentiment>().is_err());
        assert_eq!("user".parse::<Sender>(), Ok(Sender::User));
    }
}
