use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (users, mood_entries, chat_messages)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                first_name  TEXT,
                last_name   TEXT,
                email       TEXT,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE mood_entries (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     INTEGER NOT NULL REFERENCES users(id),
                mood        TEXT NOT NULL,
                notes       TEXT,
                timestamp   TEXT NOT NULL
            );

            CREATE INDEX idx_mood_entries_user
                ON mood_entries(user_id, id);

            CREATE TABLE chat_messages (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     INTEGER NOT NULL REFERENCES users(id),
                sender      TEXT NOT NULL,
                message     TEXT NOT NULL,
                sentiment   TEXT,
                suggestions TEXT,
                timestamp   TEXT NOT NULL
            );

            CREATE INDEX idx_chat_messages_user
                ON chat_messages(user_id, id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
