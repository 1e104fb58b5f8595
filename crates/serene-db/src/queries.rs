use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use serene_types::models::{ChatMessage, MoodEntry, NewChatMessage, NewMoodEntry, NewUser, User};

use crate::Database;
use crate::models::{ChatMessageRow, MoodEntryRow, UserRow, format_timestamp};
use crate::storage::Storage;

const USER_COLUMNS: &str = "id, username, password, first_name, last_name, email, created_at";

impl Storage for Database {
    // -- Users --

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.with_conn(|conn| query_user(conn, "id", &id))
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.with_conn(|conn| query_user(conn, "username", &username))
    }

    fn create_user(&self, user: NewUser) -> Result<User> {
        let created_at = Utc::now();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password, first_name, last_name, email, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    user.username,
                    user.password,
                    user.first_name,
                    user.last_name,
                    user.email,
                    format_timestamp(&created_at),
                ],
            )?;

            Ok(User {
                id: conn.last_insert_rowid(),
                username: user.username,
                password: user.password,
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                created_at,
            })
        })
    }

    // -- Mood entries --

    fn create_mood_entry(&self, entry: NewMoodEntry) -> Result<MoodEntry> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO mood_entries (user_id, mood, notes, timestamp) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    entry.user_id,
                    entry.mood,
                    entry.notes,
                    format_timestamp(&entry.timestamp),
                ],
            )?;

            Ok(MoodEntry {
                id: conn.last_insert_rowid(),
                user_id: entry.user_id,
                mood: entry.mood,
                notes: entry.notes,
                timestamp: entry.timestamp,
            })
        })
    }

    fn list_mood_entries(&self, user_id: i64) -> Result<Vec<MoodEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, mood, notes, timestamp
                 FROM mood_entries
                 WHERE user_id = ?1
                 ORDER BY id ASC",
            )?;

            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(MoodEntryRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        mood: row.get(2)?,
                        notes: row.get(3)?,
                        timestamp: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(MoodEntry::try_from).collect()
        })
    }

    // -- Chat --

    fn append_chat_message(&self, message: NewChatMessage) -> Result<ChatMessage> {
        let suggestions = message
            .suggestions
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat_messages (user_id, sender, message, sentiment, suggestions, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    message.user_id,
                    message.sender.as_str(),
                    message.message,
                    message.sentiment.map(|s| s.as_str()),
                    suggestions,
                    format_timestamp(&message.timestamp),
                ],
            )?;

            Ok(ChatMessage {
                id: conn.last_insert_rowid(),
                user_id: message.user_id,
                sender: message.sender,
                message: message.message,
                sentiment: message.sentiment,
                suggestions: message.suggestions,
                timestamp: message.timestamp,
            })
        })
    }

    fn list_chat_messages(&self, user_id: i64) -> Result<Vec<ChatMessage>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, sender, message, sentiment, suggestions, timestamp
                 FROM chat_messages
                 WHERE user_id = ?1
                 ORDER BY id ASC",
            )?;

            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(ChatMessageRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        sender: row.get(2)?,
                        message: row.get(3)?,
                        sentiment: row.get(4)?,
                        suggestions: row.get(5)?,
                        timestamp: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(ChatMessage::try_from).collect()
        })
    }
}

/// `column` is always one of our own literals, never caller input.
fn query_user(conn: &Connection, column: &str, value: &dyn rusqlite::ToSql) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE {} = ?1", USER_COLUMNS, column);
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row(&[value][..], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                first_name: row.get(3)?,
                last_name: row.get(4)?,
                email: row.get(5)?,
                created_at: row.get(6)?,
            })
        })
        .optional()?;

    row.map(User::try_from).transpose()
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serene_types::models::{Sender, Sentiment};

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            password: "hash".to_string(),
            first_name: Some("First".to_string()),
            last_name: None,
            email: Some(format!("{}@example.com", name)),
        }
    }

    #[test]
    fn creates_and_finds_users() {
        let db = Database::open_in_memory().unwrap();

        let a = db.create_user(new_user("alice")).unwrap();
        let b = db.create_user(new_user("bob")).unwrap();
        assert!(b.id > a.id);

        let found = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(found.id, a.id);
        assert_eq!(found.first_name.as_deref(), Some("First"));
        assert_eq!(found.last_name, None);
        assert_eq!(found.email.as_deref(), Some("alice@example.com"));

        assert_eq!(db.get_user(b.id).unwrap().unwrap().username, "bob");
        assert!(db.get_user(1000).unwrap().is_none());
        assert!(db.get_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_rejected_by_schema() {
        let db = Database::open_in_memory().unwrap();
        db.create_user(new_user("alice")).unwrap();
        assert!(db.create_user(new_user("alice")).is_err());
    }

    #[test]
    fn mood_entries_round_trip_in_order() {
        let db = Database::open_in_memory().unwrap();
        let user = db.create_user(new_user("alice")).unwrap();
        let other = db.create_user(new_user("bob")).unwrap();
        let now = Utc::now();

        for (mood, notes) in [("good", Some("walk")), ("down", None)] {
            db.create_mood_entry(NewMoodEntry {
                user_id: user.id,
                mood: mood.to_string(),
                notes: notes.map(str::to_string),
                timestamp: now,
            })
            .unwrap();
        }

        let entries = db.list_mood_entries(user.id).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].mood, "good");
        assert_eq!(entries[0].notes.as_deref(), Some("walk"));
        assert_eq!(entries[1].notes, None);
        assert_eq!(entries[0].timestamp, now);
        assert!(db.list_mood_entries(other.id).unwrap().is_empty());
    }

    #[test]
    fn chat_messages_keep_sentiment_and_suggestions() {
        let db = Database::open_in_memory().unwrap();
        let user = db.create_user(new_user("alice")).unwrap();
        let now = Utc::now();

        db.append_chat_message(NewChatMessage::from_user(user.id, "so stressed", now)).unwrap();
        db.append_chat_message(NewChatMessage::from_ai(
            user.id,
            "breathe",
            Sentiment::Stress,
            vec!["Try breathing exercise".to_string(), "Show meditation".to_string()],
            now,
        ))
        .unwrap();

        let history = db.list_chat_messages(user.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sender, Sender::User);
        assert_eq!(history[0].sentiment, None);
        assert_eq!(history[0].suggestions, None);
        assert_eq!(history[1].sender, Sender::Ai);
        assert_eq!(history[1].sentiment, Some(Sentiment::Stress));
        assert_eq!(
            history[1].suggestions.as_deref(),
            Some(&["Try breathing exercise".to_string(), "Show meditation".to_string()][..])
        );
    }

    #[test]
    fn chat_message_requires_existing_user() {
        let db = Database::open_in_memory().unwrap();
        let result = db.append_chat_message(NewChatMessage::from_user(42, "hello", Utc::now()));
        assert!(result.is_err());
    }
}
