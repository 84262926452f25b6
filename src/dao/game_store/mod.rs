pub mod memory;
/// MongoDB backend.
#[cfg(feature = "mongo-store")]
pub mod mongodb;
/// SQLite backend.
#[cfg(feature = "sqlite-store")]
pub mod sqlite;

use std::sync::Arc;

use crate::config::StorageBackend;
use crate::dao::models::{GameId, GamePatch, GameRecordEntity};
use crate::dao::storage::{StorageError, StorageResult};
use futures::future::BoxFuture;
use thiserror::Error;

/// Abstraction over the persistence layer owning the game records table.
pub trait GameStore: Send + Sync {
    /// Insert a record with every counter at zero and return it with its assigned id.
    fn create_game(&self) -> BoxFuture<'static, StorageResult<GameRecordEntity>>;
    /// Apply `patch` to the record `id` in a single write.
    ///
    /// Returns `None` without touching anything when no such record exists.
    fn update_game(
        &self,
        id: GameId,
        patch: GamePatch,
    ) -> BoxFuture<'static, StorageResult<Option<GameRecordEntity>>>;
    /// Every record, most recently created first.
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameRecordEntity>>>;
    /// Cheap round trip proving the backend still answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend handle in place after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// The configured backend was left out of this build by cargo features.
#[derive(Debug, Error)]
#[error("{backend} storage support is not compiled into this build")]
pub struct BackendDisabled {
    /// Backend name as logged by [`StorageBackend::kind`].
    pub backend: &'static str,
}

/// Open the store described by `backend`.
#[cfg_attr(not(feature = "mongo-store"), allow(unused_variables))]
pub async fn connect(
    backend: &StorageBackend,
    mongo_db: Option<&str>,
) -> StorageResult<Arc<dyn GameStore>> {
    match backend {
        StorageBackend::Memory => Ok(Arc::new(memory::MemoryGameStore::new())),
        #[cfg(feature = "sqlite-store")]
        StorageBackend::Sqlite { path } => {
            let store = self::sqlite::SqliteGameStore::connect(path.clone()).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "mongo-store")]
        StorageBackend::Mongo { uri } => {
            let config = self::mongodb::MongoConfig::from_uri(uri, mongo_db).await?;
            let store = self::mongodb::MongoGameStore::connect(config).await?;
            Ok(Arc::new(store))
        }
        #[allow(unreachable_patterns)]
        other => {
            let err = BackendDisabled {
                backend: other.kind(),
            };
            Err(StorageError::unavailable(err.to_string(), err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let store = connect(&StorageBackend::Memory, None).await.unwrap();

        let record = store.create_game().await.unwrap();
        assert_eq!(record.game_id, 1);
        store.health_check().await.unwrap();
    }

    #[cfg(feature = "sqlite-store")]
    #[tokio::test]
    async fn test_connect_sqlite_in_memory() {
        let backend = StorageBackend::parse("sqlite::memory:").unwrap();
        let store = connect(&backend, None).await.unwrap();

        store.create_game().await.unwrap();
        let records = store.list_games().await.unwrap();
        assert_eq!(records, vec![GameRecordEntity::new(1)]);
    }
}
