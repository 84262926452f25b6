use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::{Bson, Document, doc},
    options::ReturnDocument,
};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoGameDocument, doc_id, set_fields},
};
use crate::dao::{
    game_store::GameStore,
    models::{GameId, GamePatch, GameRecordEntity},
    storage::StorageResult,
};

const GAME_COLLECTION_NAME: &str = "tbl_game_inst";
const COUNTER_COLLECTION_NAME: &str = "counters";
const GAME_ID_COUNTER: &str = "game_id";

#[derive(Clone)]
pub struct MongoGameStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoGameStore {
    /// Establish a connection to MongoDB.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        Ok(Self { inner })
    }

    async fn collection(&self) -> Collection<MongoGameDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
    }

    async fn counter_collection(&self) -> Collection<Document> {
        let guard = self.inner.state.read().await;
        guard.database.collection::<Document>(COUNTER_COLLECTION_NAME)
    }

    /// Atomically bump the id counter. Ids are never handed out twice, even when the
    /// following insert fails.
    async fn next_id(&self) -> MongoResult<GameId> {
        let counters = self.counter_collection().await;
        let counter = counters
            .find_one_and_update(
                doc! { "_id": GAME_ID_COUNTER },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::NextId { source })?;

        counter
            .as_ref()
            .and_then(|document| document.get("seq"))
            .and_then(Bson::as_i64)
            .ok_or(MongoDaoError::MalformedCounter)
    }

    async fn create_game(&self) -> MongoResult<GameRecordEntity> {
        let id = self.next_id().await?;
        let record = GameRecordEntity::new(id);
        let document: MongoGameDocument = record.into();

        self.collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertGame { id, source })?;

        Ok(record)
    }

    async fn update_game(
        &self,
        id: GameId,
        patch: GamePatch,
    ) -> MongoResult<Option<GameRecordEntity>> {
        let collection = self.collection().await;

        // An empty `$set` is rejected by the server, so a no-op patch is a plain lookup.
        let document = if patch.is_empty() {
            collection
                .find_one(doc_id(id))
                .await
                .map_err(|source| MongoDaoError::UpdateGame { id, source })?
        } else {
            collection
                .find_one_and_update(doc_id(id), doc! { "$set": set_fields(&patch) })
                .return_document(ReturnDocument::After)
                .await
                .map_err(|source| MongoDaoError::UpdateGame { id, source })?
        };

        Ok(document.map(Into::into))
    }

    async fn list_games(&self) -> MongoResult<Vec<GameRecordEntity>> {
        let collection = self.collection().await;

        let documents: Vec<MongoGameDocument> = collection
            .find(doc! {})
            .sort(doc! { "_id": -1 })
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

impl GameStore for MongoGameStore {
    fn create_game(&self) -> BoxFuture<'static, StorageResult<GameRecordEntity>> {
        let store = self.clone();
        Box::pin(async move { store.create_game().await.map_err(Into::into) })
    }

    fn update_game(
        &self,
        id: GameId,
        patch: GamePatch,
    ) -> BoxFuture<'static, StorageResult<Option<GameRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.update_game(id, patch).await.map_err(Into::into) })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
