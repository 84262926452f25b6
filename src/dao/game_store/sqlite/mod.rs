mod error;
mod schema;
/// Store implementation over a single `rusqlite` connection.
pub mod store;

pub use error::SqliteDaoError;
pub use store::SqliteGameStore;

use crate::dao::storage::StorageError;

impl From<SqliteDaoError> for StorageError {
    fn from(err: SqliteDaoError) -> Self {
        let message = err.to_string();
        match err {
            SqliteDaoError::Open { .. }
            | SqliteDaoError::HealthPing { .. }
            | SqliteDaoError::LockPoisoned
            | SqliteDaoError::Worker { .. } => StorageError::unavailable(message, err),
            _ => StorageError::operation(message, err),
        }
    }
}
