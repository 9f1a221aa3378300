use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Signing key used when none is configured. Tokens signed with it are
/// only as secret as this source file.
pub const DEFAULT_JWT_SECRET: &str = "change-me";

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ZenyConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub provider: ProviderConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    /// Gemini API key. Without one, chat falls back to simulated replies.
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8001,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_zeny_dir()
            .join("zeny.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.into(),
            admin_username: "admin".into(),
            admin_password: "admin".into(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.into(),
            default_model: "gemini-2.5-pro".into(),
            timeout_secs: 60,
        }
    }
}

/// Returns `~/.zeny/`, or `./.zeny/` when no home directory is known.
pub fn default_zeny_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".zeny")
}

/// Returns the default config file path: `~/.zeny/config.toml`
pub fn default_config_path() -> PathBuf {
    default_zeny_dir().join("config.toml")
}

impl ZenyConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ZenyConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("ZENY_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("ZENY_PORT") {
            self.server.port = val
                .parse()
                .with_context(|| format!("ZENY_PORT is not a valid port: {val}"))?;
        }
        if let Ok(val) = std::env::var("ZENY_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("ZENY_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("JWT_SECRET_KEY") {
            self.auth.jwt_secret = val;
        }
        if let Ok(val) = std::env::var("ZENY_ADMIN_USERNAME") {
            self.auth.admin_username = val;
        }
        if let Ok(val) = std::env::var("ZENY_ADMIN_PASSWORD") {
            self.auth.admin_password = val;
        }
        if let Ok(val) = std::env::var("GEMINI_API_KEY") {
            self.provider.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("GEMINI_BASE_URL") {
            self.provider.base_url = val;
        }
        if let Ok(val) = std::env::var("GEMINI_MODEL") {
            self.provider.default_model = val;
        }
        Ok(())
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// The configured API key, treating an empty string as absent.
    pub fn provider_api_key(&self) -> Option<&str> {
        self.provider
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
