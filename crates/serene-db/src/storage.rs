//! The storage seam shared by the in-memory and SQLite backends.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use serene_types::models::{ChatMessage, MoodEntry, NewChatMessage, NewMoodEntry, NewUser, User};

use crate::memory::MemStorage;
use crate::{Database, seed};

/// Users, mood entries and chat history.
///
/// Implementations own their state and are shared behind an `Arc` for the
/// lifetime of the process. Calls are synchronous; async callers should run
/// them on a blocking thread.
pub trait Storage: Send + Sync {
    // -- Users --

    fn get_user(&self, id: i64) -> Result<Option<User>>;

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Inserts a user under the next sequential id. Username uniqueness is
    /// the caller's responsibility.
    fn create_user(&self, user: NewUser) -> Result<User>;

    // -- Mood entries --

    fn create_mood_entry(&self, entry: NewMoodEntry) -> Result<MoodEntry>;

    /// Entries for `user_id` in insertion order.
    fn list_mood_entries(&self, user_id: i64) -> Result<Vec<MoodEntry>>;

    // -- Chat --

    fn append_chat_message(&self, message: NewChatMessage) -> Result<ChatMessage>;

    /// Messages for `user_id` in insertion order.
    fn list_chat_messages(&self, user_id: i64) -> Result<Vec<ChatMessage>>;
}

/// Pick the backend once at startup: SQLite when a database path is
/// configured, process memory otherwise. The demo account is seeded either way.
pub fn open_storage(db_path: Option<&Path>) -> Result<Arc<dyn Storage>> {
    let store: Arc<dyn Storage> = match db_path {
        Some(path) => {
            info!("Using SQLite storage at {}", path.display());
            Arc::new(Database::open(path)?)
        }
        None => {
            info!("No database path configured, using memory storage");
            Arc::new(MemStorage::new())
        }
    };

    seed::seed_demo(store.as_ref())?;
    Ok(store)
}
