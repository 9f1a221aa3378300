//! Append-only chat log.

use anyhow::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::db::now_timestamp;

/// One user/avatar exchange, matching the `chat_history` table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: String,
    /// Avatar the user talked to. Not enforced: the avatar may since have been deleted.
    pub avatar_id: String,
    pub user_message: String,
    pub avatar_response: String,
    /// RFC 3339 time the exchange was recorded.
    pub timestamp: String,
}

pub fn record_chat(
    conn: &Connection,
    avatar_id: &str,
    user_message: &str,
    avatar_response: &str,
) -> Result<ChatRecord> {
    let record = ChatRecord {
        id: uuid::Uuid::now_v7().to_string(),
        avatar_id: avatar_id.to_string(),
        user_message: user_message.to_string(),
        avatar_response: avatar_response.to_string(),
        timestamp: now_timestamp(),
    };

    conn.execute(
        "INSERT INTO chat_history (id, avatar_id, user_message, avatar_response, timestamp) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.id,
            record.avatar_id,
            record.user_message,
            record.avatar_response,
            record.timestamp,
        ],
    )?;

    Ok(record)
}

/// Most recent exchanges first, at most `limit` rows.
pub fn list_recent(conn: &Connection, limit: usize) -> Result<Vec<ChatRecord>> {
    // rowid breaks ties between turns recorded in the same microsecond
    let mut stmt = conn.prepare(
        "SELECT id, avatar_id, user_message, avatar_response, timestamp FROM chat_history \
         ORDER BY timestamp DESC, rowid DESC LIMIT ?1",
    )?;
    let records = stmt
        .query_map(params![i64::try_from(limit)?], |row| {
            Ok(ChatRecord {
                id: row.get(0)?,
                avatar_id: row.get(1)?,
                user_message: row.get(2)?,
                avatar_response: row.get(3)?,
                timestamp: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}
