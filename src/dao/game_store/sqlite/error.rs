//! Error types shared by the SQLite storage implementation.

use rusqlite::Error as SqliteError;
use thiserror::Error;

/// Convenient result alias returning [`SqliteDaoError`] failures.
pub type SqliteResult<T> = Result<T, SqliteDaoError>;

/// Failures that can occur while interacting with SQLite.
#[derive(Debug, Error)]
pub enum SqliteDaoError {
    /// The database file could not be opened.
    #[error("failed to open SQLite database `{path}`")]
    Open {
        path: String,
        #[source]
        source: SqliteError,
    },
    /// Creating the games table failed.
    #[error("failed to ensure SQLite schema")]
    EnsureSchema {
        #[source]
        source: SqliteError,
    },
    /// `SELECT 1` did not succeed.
    #[error("SQLite health check failed")]
    HealthPing {
        #[source]
        source: SqliteError,
    },
    /// Another call panicked while holding the connection.
    #[error("SQLite connection lock poisoned")]
    LockPoisoned,
    /// The blocking task running the statement did not complete.
    #[error("SQLite worker task failed")]
    Worker {
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("failed to insert game")]
    InsertGame {
        #[source]
        source: SqliteError,
    },
    #[error("failed to update game `{id}`")]
    UpdateGame {
        id: i64,
        #[source]
        source: SqliteError,
    },
    #[error("failed to list games")]
    ListGames {
        #[source]
        source: SqliteError,
    },
}
