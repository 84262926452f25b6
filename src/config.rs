//! Application-level configuration: storage backend selection and listening port.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GAME_STATS_CONFIG_PATH";
/// Database used when nothing else is configured.
const DEFAULT_DATABASE_URL: &str = "sqlite:///local.db";
const DEFAULT_PORT: u16 = 8080;
/// Path understood by SQLite as a private in-memory database.
const IN_MEMORY_SQLITE: &str = ":memory:";

/// Where game records are stored, parsed from a database URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// `memory://`: records live in the process and vanish with it.
    Memory,
    /// `sqlite:///relative.db` or `sqlite:////absolute.db`; `sqlite://` and
    /// `sqlite::memory:` open a private in-memory database.
    Sqlite {
        /// Filesystem path handed to SQLite, or `:memory:`.
        path: String,
    },
    /// `mongodb://` or `mongodb+srv://`, passed through untouched.
    Mongo {
        /// Connection string given to the MongoDB driver.
        uri: String,
    },
}

/// Database URL that cannot be served by any backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No backend understands the URL scheme.
    #[error("unsupported database URL scheme in `{url}`")]
    UnsupportedScheme {
        /// Offending URL.
        url: String,
    },
    /// PostgreSQL URL, normalised to `postgresql://`.
    #[error("PostgreSQL is not supported (`{url}`); use sqlite:// or mongodb://")]
    PostgresUnsupported {
        /// Normalised URL.
        url: String,
    },
    /// `sqlite://host/...`: SQLite URLs carry no host, the path starts after the third slash.
    #[error("sqlite URL `{url}` names a host; use sqlite:///relative.db or sqlite:////absolute.db")]
    SqliteHost {
        /// Offending URL.
        url: String,
    },
}

impl StorageBackend {
    /// Parse a database URL.
    ///
    /// Legacy `postgres://` URLs are normalised to `postgresql://` before being refused.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();

        if url == "memory://" {
            return Ok(StorageBackend::Memory);
        }
        if url == "sqlite::memory:" {
            return Ok(StorageBackend::Sqlite {
                path: IN_MEMORY_SQLITE.into(),
            });
        }
        if let Some(rest) = url.strip_prefix("sqlite://") {
            // SQLAlchemy layout: everything after the third slash is the path, so
            // `sqlite:///local.db` is relative and `sqlite:////var/x.db` is absolute.
            let path = match rest.strip_prefix('/') {
                _ if rest.is_empty() => IN_MEMORY_SQLITE,
                Some("") => IN_MEMORY_SQLITE,
                Some(path) => path,
                None => return Err(ConfigError::SqliteHost { url: url.into() }),
            };
            return Ok(StorageBackend::Sqlite { path: path.into() });
        }
        if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
            return Ok(StorageBackend::Mongo { uri: url.into() });
        }
        if let Some(rest) = url.strip_prefix("postgres://") {
            return Err(ConfigError::PostgresUnsupported {
                url: format!("postgresql://{rest}"),
            });
        }
        if url.starts_with("postgresql://") {
            return Err(ConfigError::PostgresUnsupported { url: url.into() });
        }

        Err(ConfigError::UnsupportedScheme { url: url.into() })
    }

    /// Short backend name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Sqlite { .. } => "sqlite",
            StorageBackend::Mongo { .. } => "mongodb",
        }
    }
}

/// Immutable runtime configuration resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend the storage supervisor connects to.
    pub backend: StorageBackend,
    /// MongoDB database name override; unused by other backends.
    pub mongo_db: Option<String>,
    /// TCP port the HTTP server binds on all interfaces.
    pub port: u16,
}

impl AppConfig {
    /// Load the configuration file (if any), then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let raw = RawConfig::load().with_env(|key| env::var(key).ok());
        raw.resolve()
    }
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    database_url: Option<String>,
    #[serde(default)]
    mongo_db: Option<String>,
    #[serde(default)]
    port: Option<u16>,
}

impl RawConfig {
    fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    raw
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Apply `DATABASE_URL`, `MONGO_DB` and `PORT`/`SERVER_PORT` on top of the file values.
    fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(db) = var("MONGO_DB").filter(|db| !db.is_empty()) {
            self.mongo_db = Some(db);
        }
        let port = var("PORT").or_else(|| var("SERVER_PORT"));
        match port.as_deref().map(str::parse::<u16>) {
            Some(Ok(port)) => self.port = Some(port),
            Some(Err(err)) => warn!(error = %err, "ignoring invalid port override"),
            None => {}
        }
        self
    }

    fn resolve(self) -> Result<AppConfig, ConfigError> {
        let url = self
            .database_url
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());
        Ok(AppConfig {
            backend: StorageBackend::parse(&url)?,
            mongo_db: self.mongo_db,
            port: self.port.unwrap_or(DEFAULT_PORT),
        })
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
