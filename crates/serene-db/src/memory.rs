use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use chrono::Utc;

use serene_types::models::{ChatMessage, MoodEntry, NewChatMessage, NewMoodEntry, NewUser, User};

use crate::storage::Storage;

/// Process-local store. Everything is lost on restart.
pub struct MemStorage {
    inner: Mutex<MemInner>,
}

struct MemInner {
    users: HashMap<i64, User>,
    mood_entries: HashMap<i64, Vec<MoodEntry>>,
    chat_messages: HashMap<i64, Vec<ChatMessage>>,
    next_user_id: i64,
    next_entry_id: i64,
    next_message_id: i64,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemInner {
                users: HashMap::new(),
                mood_entries: HashMap::new(),
                chat_messages: HashMap::new(),
                next_user_id: 1,
                next_entry_id: 1,
                next_message_id: 1,
            }),
        }
    }

    fn with_inner<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut MemInner) -> T,
    {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| anyhow::anyhow!("Memory store lock poisoned: {}", e))?;
        Ok(f(&mut inner))
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemStorage {
    fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.with_inner(|inner| inner.users.get(&id).cloned())
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.with_inner(|inner| inner.users.values().find(|u| u.username == username).cloned())
    }

    fn create_user(&self, user: NewUser) -> Result<User> {
        self.with_inner(|inner| {
            let id = inner.next_user_id;
            inner.next_user_id += 1;

            let user = User {
                id,
                username: user.username,
                password: user.password,
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                created_at: Utc::now(),
            };
            inner.users.insert(id, user.clone());
            user
        })
    }

    fn create_mood_entry(&self, entry: NewMoodEntry) -> Result<MoodEntry> {
        self.with_inner(|inner| {
            let id = inner.next_entry_id;
            inner.next_entry_id += 1;

            let entry = MoodEntry {
                id,
                user_id: entry.user_id,
                mood: entry.mood,
                notes: entry.notes,
                timestamp: entry.timestamp,
            };
            inner.mood_entries.entry(entry.user_id).or_default().push(entry.clone());
            entry
        })
    }

    fn list_mood_entries(&self, user_id: i64) -> Result<Vec<MoodEntry>> {
        self.with_inner(|inner| inner.mood_entries.get(&user_id).cloned().unwrap_or_default())
    }

    fn append_chat_message(&self, message: NewChatMessage) -> Result<ChatMessage> {
        self.with_inner(|inner| {
            let id = inner.next_message_id;
            inner.next_message_id += 1;

            let message = ChatMessage {
                id,
                user_id: message.user_id,
                sender: message.sender,
                message: message.message,
                sentiment: message.sentiment,
                suggestions: message.suggestions,
                timestamp: message.timestamp,
            };
            inner.chat_messages.entry(message.user_id).or_default().push(message.clone());
            message
        })
    }

    fn list_chat_messages(&self, user_id: i64) -> Result<Vec<ChatMessage>> {
        self.with_inner(|inner| inner.chat_messages.get(&user_id).cloned().unwrap_or_default())
    }
}
