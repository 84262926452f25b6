use rusqlite::{Connection, Row};

use super::error::{SqliteDaoError, SqliteResult};
use crate::dao::models::GameRecordEntity;

/// Table holding one row per game record.
pub const GAME_TABLE_NAME: &str = "tbl_game_inst";
/// Column list shared by every statement returning full rows, in [`map_game_row`] order.
pub const GAME_COLUMNS: &str = "game_id, n_cust_served, n_cust_satisfied, n_cust_not_satisfied";

/// Create the games table when missing. `AUTOINCREMENT` keeps ids from being reused.
pub fn ensure_schema(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {GAME_TABLE_NAME} (
            game_id              INTEGER PRIMARY KEY AUTOINCREMENT,
            n_cust_served        INTEGER DEFAULT 0,
            n_cust_satisfied     INTEGER DEFAULT 0,
            n_cust_not_satisfied INTEGER DEFAULT 0
        );"
    ))
    .map_err(|source| SqliteDaoError::EnsureSchema { source })
}

/// Map a row selected with [`GAME_COLUMNS`]. Counters left `NULL` by foreign writers read as 0.
pub fn map_game_row(row: &Row<'_>) -> rusqlite::Result<GameRecordEntity> {
    Ok(GameRecordEntity {
        game_id: row.get(0)?,
        n_cust_served: row.get::<_, Option<i64>>(1)?.unwrap_or_default(),
        n_cust_satisfied: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
        n_cust_not_satisfied: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
    })
}
