use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use super::{
    error::{SqliteDaoError, SqliteResult},
    schema::{GAME_COLUMNS, GAME_TABLE_NAME, ensure_schema, map_game_row},
};
use crate::dao::{
    game_store::GameStore,
    models::{GameId, GamePatch, GameRecordEntity},
    storage::StorageResult,
};

/// Path understood by SQLite as a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Clone)]
pub struct SqliteGameStore {
    inner: Arc<SqliteInner>,
}

struct SqliteInner {
    conn: Mutex<Connection>,
    path: String,
}

impl SqliteGameStore {
    /// Open (or create) the database at `path` and make sure the games table exists.
    pub async fn connect(path: impl Into<String>) -> SqliteResult<Self> {
        let path = path.into();
        let conn = {
            let path = path.clone();
            tokio::task::spawn_blocking(move || open_connection(&path))
                .await
                .map_err(|source| SqliteDaoError::Worker { source })??
        };

        Ok(Self {
            inner: Arc::new(SqliteInner {
                conn: Mutex::new(conn),
                path,
            }),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> SqliteResult<Self> {
        let conn = open_connection(IN_MEMORY_PATH)?;
        Ok(Self {
            inner: Arc::new(SqliteInner {
                conn: Mutex::new(conn),
                path: IN_MEMORY_PATH.to_owned(),
            }),
        })
    }

    /// Run `work` on the blocking pool while holding the connection lock.
    ///
    /// The guard lives only inside the closure so it is released on every exit path.
    async fn with_connection<T, F>(&self, work: F) -> SqliteResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> SqliteResult<T> + Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || -> SqliteResult<T> {
            let mut guard = inner
                .conn
                .lock()
                .map_err(|_| SqliteDaoError::LockPoisoned)?;
            work(&mut *guard)
        })
        .await
        .map_err(|source| SqliteDaoError::Worker { source })?
    }

    async fn create_game(&self) -> SqliteResult<GameRecordEntity> {
        self.with_connection(|conn| {
            conn.query_row(
                &format!("INSERT INTO {GAME_TABLE_NAME} DEFAULT VALUES RETURNING {GAME_COLUMNS}"),
                [],
                map_game_row,
            )
            .map_err(|source| SqliteDaoError::InsertGame { source })
        })
        .await
    }

    async fn update_game(
        &self,
        id: GameId,
        patch: GamePatch,
    ) -> SqliteResult<Option<GameRecordEntity>> {
        self.with_connection(move |conn| {
            conn.query_row(
                &format!(
                    "UPDATE {GAME_TABLE_NAME} SET
                        n_cust_served = COALESCE(?1, n_cust_served),
                        n_cust_satisfied = COALESCE(?2, n_cust_satisfied),
                        n_cust_not_satisfied = COALESCE(?3, n_cust_not_satisfied)
                     WHERE game_id = ?4
                     RETURNING {GAME_COLUMNS}"
                ),
                params![
                    patch.n_cust_served,
                    patch.n_cust_satisfied,
                    patch.n_cust_not_satisfied,
                    id
                ],
                map_game_row,
            )
            .optional()
            .map_err(|source| SqliteDaoError::UpdateGame { id, source })
        })
        .await
    }

    async fn list_games(&self) -> SqliteResult<Vec<GameRecordEntity>> {
        self.with_connection(|conn| {
            let mut statement = conn
                .prepare(&format!(
                    "SELECT {GAME_COLUMNS} FROM {GAME_TABLE_NAME} ORDER BY game_id DESC"
                ))
                .map_err(|source| SqliteDaoError::ListGames { source })?;
            let rows = statement
                .query_map([], map_game_row)
                .map_err(|source| SqliteDaoError::ListGames { source })?;
            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|source| SqliteDaoError::ListGames { source })
        })
        .await
    }

    async fn ping(&self) -> SqliteResult<()> {
        self.with_connection(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map(|_| ())
                .map_err(|source| SqliteDaoError::HealthPing { source })
        })
        .await
    }

    async fn reconnect(&self) -> SqliteResult<()> {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || -> SqliteResult<()> {
            // Reopening an in-memory database would silently drop every record.
            if inner.path == IN_MEMORY_PATH {
                return Ok(());
            }
            let fresh = open_connection(&inner.path)?;
            let mut guard = inner
                .conn
                .lock()
                .map_err(|_| SqliteDaoError::LockPoisoned)?;
            *guard = fresh;
            debug!(path = %inner.path, "reopened SQLite connection");
            Ok(())
        })
        .await
        .map_err(|source| SqliteDaoError::Worker { source })?
    }
}

fn open_connection(path: &str) -> SqliteResult<Connection> {
    let conn = Connection::open(path).map_err(|source| SqliteDaoError::Open {
        path: path.to_owned(),
        source,
    })?;
    ensure_schema(&conn)?;
    Ok(conn)
}

impl GameStore for SqliteGameStore {
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
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.reconnect().await.map_err(Into::into) })
    }
}
