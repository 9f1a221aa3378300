pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Upper bound on rows returned by any list query.
pub const MAX_LIST_RESULTS: usize = 1000;

/// The single connection shared by all request handlers.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Run a synchronous store operation on the blocking pool.
pub async fn with_conn<T, F>(db: &SharedConnection, op: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || {
        let conn = db
            .lock()
            .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
        op(&conn)
    })
    .await
    .map_err(|e| anyhow::anyhow!("db task failed: {e}"))?
}

/// Open (or create) the Zeny database at the given path with schema and
/// migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    // WAL lets the public list endpoints read while a chat turn is being written
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.busy_timeout(std::time::Duration::from_millis(5000))?;

    init(&conn)?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database with schema and migrations applied.
pub fn open_memory_database() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    init(&conn)?;
    Ok(conn)
}

fn init(conn: &Connection) -> Result<()> {
    schema::init_schema(conn).context("failed to initialize schema")?;
    migrations::run_migrations(conn).context("failed to run migrations")?;
    Ok(())
}

/// Result of [`check_database_health`].
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub schema_version: u32,
    pub integrity_ok: bool,
    pub integrity_details: String,
    pub avatar_count: u64,
    pub chat_count: u64,
    pub status_count: u64,
}

/// Run `PRAGMA integrity_check` and collect row counts.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let schema_version = migrations::get_schema_version(conn)?;

    let integrity_details: String =
        conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    let integrity_ok = integrity_details == "ok";

    Ok(HealthReport {
        schema_version,
        integrity_ok,
        integrity_details,
        avatar_count: count_rows(conn, "avatars")?,
        chat_count: count_rows(conn, "chat_history")?,
        status_count: count_rows(conn, "status_checks")?,
    })
}

fn count_rows(conn: &Connection, table: &str) -> Result<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count as u64)
}

/// Current UTC time as RFC 3339 with fixed microsecond precision, so stored
/// timestamps sort lexically in chronological order.
pub fn now_timestamp() -> String {
    format_timestamp(chrono::Utc::now())
}

/// A timestamp strictly later than `previous`: the current time, or
/// `previous` plus one microsecond when the clock has not moved past it.
pub fn next_timestamp(previous: &str) -> String {
    let now = chrono::Utc::now();
    match chrono::DateTime::parse_from_rfc3339(previous) {
        Ok(prev) => {
            let prev = prev.with_timezone(&chrono::Utc);
            if now > prev {
                format_timestamp(now)
            } else {
                format_timestamp(prev + chrono::Duration::microseconds(1))
            }
        }
        Err(_) => format_timestamp(now),
    }
}

fn format_timestamp(t: chrono::DateTime<chrono::Utc>) -> String {
    t.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
