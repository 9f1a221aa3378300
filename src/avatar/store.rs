//! Avatar persistence: create, list, fetch, partial update, delete.
//!
//! All functions take a plain `&Connection`; callers in async contexts run them
//! under `tokio::task::spawn_blocking`.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::types::{Avatar, AvatarUpdate, NewAvatar};
use crate::db::{next_timestamp, now_timestamp};

const AVATAR_COLUMNS: &str =
    "id, name, description, personality, instructions, created_at, updated_at";

/// Insert a new avatar with a fresh id and identical creation/update timestamps.
pub fn create_avatar(conn: &Connection, new: NewAvatar) -> Result<Avatar> {
    let now = now_timestamp();
    let avatar = Avatar {
        id: uuid::Uuid::now_v7().to_string(),
        name: new.name,
        description: new.description,
        personality: new.personality,
        instructions: new.instructions,
        created_at: now.clone(),
        updated_at: now,
    };

    conn.execute(
        "INSERT INTO avatars (id, name, description, personality, instructions, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            avatar.id,
            avatar.name,
            avatar.description,
            avatar.personality,
            avatar.instructions,
            avatar.created_at,
            avatar.updated_at,
        ],
    )?;

    Ok(avatar)
}

/// List avatars in store order, at most `limit` rows.
pub fn list_avatars(conn: &Connection, limit: usize) -> Result<Vec<Avatar>> {
    let limit = i64::try_from(limit)?;
    let mut stmt = conn.prepare(&format!("SELECT {AVATAR_COLUMNS} FROM avatars LIMIT ?1"))?;
    let avatars = stmt
        .query_map(params![limit], row_to_avatar)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(avatars)
}

pub fn get_avatar(conn: &Connection, id: &str) -> Result<Option<Avatar>> {
    let avatar = conn
        .query_row(
            &format!("SELECT {AVATAR_COLUMNS} FROM avatars WHERE id = ?1"),
            params![id],
            row_to_avatar,
        )
        .optional()?;
    Ok(avatar)
}

/// Overwrite the provided fields and refresh `updated_at`.
///
/// Returns `None` if no avatar has this id. The update timestamp is refreshed
/// even when the partial carries no fields, and always moves forward.
pub fn update_avatar(conn: &Connection, id: &str, update: AvatarUpdate) -> Result<Option<Avatar>> {
    let Some(mut avatar) = get_avatar(conn, id)? else {
        return Ok(None);
    };

    update.apply_to(&mut avatar);
    avatar.updated_at = next_timestamp(&avatar.updated_at);

    conn.execute(
        "UPDATE avatars SET name = ?1, description = ?2, personality = ?3, instructions = ?4, updated_at = ?5 \
         WHERE id = ?6",
        params![
            avatar.name,
            avatar.description,
            avatar.personality,
            avatar.instructions,
            avatar.updated_at,
            avatar.id,
        ],
    )?;

    Ok(Some(avatar))
}

/// Delete an avatar. Returns `false` if nothing was deleted.
///
/// Chat history referencing the avatar is left in place.
pub fn delete_avatar(conn: &Connection, id: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM avatars WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}

fn row_to_avatar(row: &Row<'_>) -> rusqlite::Result<Avatar> {
    Ok(Avatar {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        personality: row.get(3)?,
        instructions: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
