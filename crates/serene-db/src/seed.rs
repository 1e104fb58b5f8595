//! Demo account and its starter history.

use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::{debug, info};

use serene_types::models::{NewChatMessage, NewMoodEntry, NewUser, Sentiment};

use crate::storage::Storage;

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo123";

/// Create the demo account if it is missing. History is only seeded together
/// with a freshly created account, so restarts against SQLite add nothing.
pub fn seed_demo(store: &dyn Storage) -> Result<()> {
    if store.get_user_by_username(DEMO_USERNAME)?.is_some() {
        debug!("Demo user already present");
        return Ok(());
    }

    // Stored as-is: login accepts the demo credentials before any hash check.
    let demo = store.create_user(NewUser {
        username: DEMO_USERNAME.to_string(),
        password: DEMO_PASSWORD.to_string(),
        first_name: Some("Demo".to_string()),
        last_name: Some("User".to_string()),
        email: Some("demo@sereneai.com".to_string()),
    })?;

    let now = Utc::now();

    let moods = [
        ("good", "Had a productive morning with meditation", now - Duration::days(2)),
        ("great", "Feeling energized after a walk in nature", now - Duration::days(1)),
        ("okay", "Busy day at work, but managed stress well", now),
    ];
    for (mood, notes, timestamp) in moods {
        store.create_mood_entry(NewMoodEntry {
            user_id: demo.id,
            mood: mood.to_string(),
            notes: Some(notes.to_string()),
            timestamp,
        })?;
    }

    let hour_ago = now - Duration::hours(1);
    store.append_chat_message(NewChatMessage::from_user(
        demo.id,
        "Hello! I'm feeling a bit stressed about an upcoming presentation.",
        hour_ago,
    ))?;
    store.append_chat_message(NewChatMessage::from_ai(
        demo.id,
        "I understand that presentations can feel overwhelming. Let's work through this together. \
         Would you like to try a quick breathing exercise to help calm your nerves, or would you \
         prefer to talk through your concerns about the presentation?",
        Sentiment::Stress,
        vec!["Try breathing exercise".to_string(), "Discuss concerns".to_string()],
        hour_ago + Duration::seconds(30),
    ))?;
    store.append_chat_message(NewChatMessage::from_user(
        demo.id,
        "The breathing exercise sounds helpful. Can you guide me through one?",
        hour_ago + Duration::minutes(1),
    ))?;

    info!("Demo user created with id {}", demo.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, MemStorage};
    use serene_types::models::Sender;

    #[test]
    fn seeds_demo_account_with_history() {
        let store = MemStorage::new();
        seed_demo(&store).unwrap();

        let demo = store.get_user_by_username(DEMO_USERNAME).unwrap().unwrap();
        assert_eq!(demo.id, 1);
        assert_eq!(demo.email.as_deref(), Some("demo@sereneai.com"));

        let moods: Vec<String> = store.list_mood_entries(demo.id).unwrap().into_iter().map(|e| e.mood).collect();
        assert_eq!(moods, ["good", "great", "okay"]);

        let senders: Vec<Sender> = store.list_chat_messages(demo.id).unwrap().into_iter().map(|m| m.sender).collect();
        assert_eq!(senders, [Sender::User, Sender::Ai, Sender::User]);
    }

    #[test]
    fn seeding_twice_is_a_no_op() {
        let db = Database::open_in_memory().unwrap();
        seed_demo(&db).unwrap();
        seed_demo(&db).unwrap();

        let demo = db.get_user_by_username(DEMO_USERNAME).unwrap().unwrap();
        assert_eq!(db.list_mood_entries(demo.id).unwrap().len(), 3);
        assert_eq!(db.list_chat_messages(demo.id).unwrap().len(), 3);
    }
}
