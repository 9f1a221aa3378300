//! Legacy client status pings, kept for older frontends that still post them.

use anyhow::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::db::now_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStatusCheck {
    pub client_name: String,
}

pub fn create_status_check(conn: &Connection, new: NewStatusCheck) -> Result<StatusCheck> {
    let check = StatusCheck {
        id: uuid::Uuid::now_v7().to_string(),
        client_name: new.client_name,
        timestamp: now_timestamp(),
    };
    conn.execute(
        "INSERT INTO status_checks (id, client_name, timestamp) VALUES (?1, ?2, ?3)",
        params![check.id, check.client_name, check.timestamp],
    )?;
    Ok(check)
}

pub fn list_status_checks(conn: &Connection, limit: usize) -> Result<Vec<StatusCheck>> {
    let mut stmt =
        conn.prepare("SELECT id, client_name, timestamp FROM status_checks LIMIT ?1")?;
    let checks = stmt
        .query_map(params![i64::try_from(limit)?], |row| {
            Ok(StatusCheck {
                id: row.get(0)?,
                client_name: row.get(1)?,
                timestamp: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(checks)
}
