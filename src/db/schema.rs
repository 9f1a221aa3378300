//! SQL DDL for all Zeny tables.
//!
//! Defines the `avatars`, `chat_history`, `status_checks`, and `schema_meta`
//! tables. All DDL uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// All schema DDL statements for Zeny's core tables.
///
/// `chat_history.avatar_id` is plain data: history outlives deleted avatars.
const SCHEMA_SQL: &str = r#"
-- Avatar personas
CREATE TABLE IF NOT EXISTS avatars (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    personality TEXT NOT NULL,
    instructions TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Append-only conversation log
CREATE TABLE IF NOT EXISTS chat_history (
    id TEXT PRIMARY KEY,
    avatar_id TEXT NOT NULL,
    user_message TEXT NOT NULL,
    avatar_response TEXT NOT NULL,
    timestamp TEXT NOT NULL
);

-- Legacy client status pings
CREATE TABLE IF NOT EXISTS status_checks (
    id TEXT PRIMARY KEY,
    client_name TEXT NOT NULL,
    timestamp TEXT NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
