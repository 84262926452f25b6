mod config;
mod connection;
mod error;
mod models;
/// Store implementation over the MongoDB driver.
pub mod store;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoGameStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        let message = err.to_string();
        match err {
            MongoDaoError::InvalidUri { .. }
            | MongoDaoError::ClientConstruction { .. }
            | MongoDaoError::InitialPing { .. }
            | MongoDaoError::HealthPing { .. } => StorageError::unavailable(message, err),
            _ => StorageError::operation(message, err),
        }
    }
}
