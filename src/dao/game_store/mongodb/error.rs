use mongodb::error::Error as MongoError;
use thiserror::Error;

/// Result alias for MongoDB store calls.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures raised by the MongoDB store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to allocate the next game id")]
    NextId {
        #[source]
        source: MongoError,
    },
    #[error("game id counter document has no integer `seq` field")]
    MalformedCounter,
    #[error("failed to insert game `{id}`")]
    InsertGame {
        id: i64,
        #[source]
        source: MongoError,
    },
    #[error("failed to update game `{id}`")]
    UpdateGame {
        id: i64,
        #[source]
        source: MongoError,
    },
    #[error("failed to list games")]
    ListGames {
        #[source]
        source: MongoError,
    },
}
