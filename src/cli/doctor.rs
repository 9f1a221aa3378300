//! CLI `doctor` command — run database diagnostics and print a health report.

use anyhow::{Context, Result};

use zeny::config::{ZenyConfig, DEFAULT_JWT_SECRET};
use zeny::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &ZenyConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `zeny serve` once to initialize it.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path)
        .map(|m| m.len())
        .unwrap_or(0);

    let conn = db::open_database(&db_path)
        .context("failed to open database (may be corrupt)")?;

    let report = db::check_database_health(&conn)
        .context("failed to run health check")?;

    println!("Zeny Health Report");
    println!("==================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Row counts:");
    println!("  Avatars:         {}", report.avatar_count);
    println!("  Chat records:    {}", report.chat_count);
    println!("  Status checks:   {}", report.status_count);
    println!();
    println!("Provider:");
    match config.provider_api_key() {
        Some(_) => println!("  Gemini:          configured ({})", config.provider.base_url),
        None => println!("  Gemini:          not configured (simulated replies)"),
    }
    println!("  Default model:   {}", config.provider.default_model);
    if config.auth.jwt_secret == DEFAULT_JWT_SECRET {
        println!("  WARNING: default JWT signing key in use. Set JWT_SECRET_KEY.");
    }
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery: restore {} from a backup.", db_path.display());
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
