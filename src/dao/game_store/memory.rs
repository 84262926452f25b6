//! In-process store used for the `memory://` backend and in tests.

use std::{collections::BTreeMap, sync::Arc};

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::dao::{
    game_store::GameStore,
    models::{GameId, GamePatch, GameRecordEntity},
    storage::StorageResult,
};

/// Records kept in a map behind an async lock; clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    inner: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    last_id: GameId,
    records: BTreeMap<GameId, GameRecordEntity>,
}

impl MemoryGameStore {
    /// Empty store whose first id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    async fn create_game(&self) -> GameRecordEntity {
        let mut guard = self.inner.write().await;
        guard.last_id += 1;
        let record = GameRecordEntity::new(guard.last_id);
        guard.records.insert(record.game_id, record);
        record
    }

    async fn update_game(&self, id: GameId, patch: GamePatch) -> Option<GameRecordEntity> {
        let mut guard = self.inner.write().await;
        let record = guard.records.get_mut(&id)?;
        record.apply(&patch);
        Some(*record)
    }

    async fn list_games(&self) -> Vec<GameRecordEntity> {
        let guard = self.inner.read().await;
        guard.records.values().rev().copied().collect()
    }
}

impl GameStore for MemoryGameStore {
    fn create_game(&self) -> BoxFuture<'static, StorageResult<GameRecordEntity>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.create_game().await) })
    }

    fn update_game(
        &self,
        id: GameId,
        patch: GamePatch,
    ) -> BoxFuture<'static, StorageResult<Option<GameRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.update_game(id, patch).await) })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.list_games().await) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let store = MemoryGameStore::new();
        let mut previous = 0;
        for _ in 0..5 {
            let record = GameStore::create_game(&store).await.unwrap();
            assert!(record.game_id > previous);
            assert_eq!(record.n_cust_served, 0);
            previous = record.game_id;
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemoryGameStore::new();
        assert!(GameStore::list_games(&store).await.unwrap().is_empty());

        for _ in 0..3 {
            GameStore::create_game(&store).await.unwrap();
        }
        let ids: Vec<_> = GameStore::list_games(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.game_id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_changes_nothing() {
        let store = MemoryGameStore::new();
        let created = GameStore::create_game(&store).await.unwrap();

        let patch = GamePatch {
            n_cust_served: Some(4),
            ..GamePatch::default()
        };
        let outcome = GameStore::update_game(&store, created.game_id + 1, patch)
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert_eq!(GameStore::list_games(&store).await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_update_keeps_omitted_fields() {
        let store = MemoryGameStore::new();
        let created = GameStore::create_game(&store).await.unwrap();
        let id = created.game_id;

        let served = GamePatch {
            n_cust_served: Some(3),
            ..GamePatch::default()
        };
        GameStore::update_game(&store, id, served).await.unwrap();
        let satisfied = GamePatch {
            n_cust_satisfied: Some(5),
            ..GamePatch::default()
        };
        let updated = GameStore::update_game(&store, id, satisfied)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.n_cust_served, 3);
        assert_eq!(updated.n_cust_satisfied, 5);
        assert_eq!(updated.n_cust_not_satisfied, 0);
    }
}
