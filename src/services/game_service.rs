use tracing::{debug, info};
use validator::Validate;

use crate::{
    dto::game::{
        GameRecord, InitGameResponse, MISSING_GAME_ID, UpdateGameRequest, UpdateGameResponse,
    },
    error::ServiceError,
    state::SharedState,
};

const GAME_NOT_FOUND: &str = "Game ID not found";

/// Create a new record with zeroed counters.
pub async fn init_game(state: &SharedState) -> Result<InitGameResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let record = store.create_game().await?;

    info!(game_id = record.game_id, "added new game");
    Ok(InitGameResponse {
        game_id: record.game_id,
    })
}

/// Overwrite the counters supplied in `request`, leaving the others untouched.
pub async fn update_game(
    state: &SharedState,
    request: UpdateGameRequest,
) -> Result<UpdateGameResponse, ServiceError> {
    let Some(game_id) = request.game_id else {
        return Err(ServiceError::InvalidInput(MISSING_GAME_ID.into()));
    };
    request.validate()?;

    let store = state.require_game_store().await?;
    let patch = request.patch();
    let Some(record) = store.update_game(game_id, patch).await? else {
        return Err(ServiceError::NotFound(GAME_NOT_FOUND.into()));
    };

    debug!(game_id, ?patch, "updated game");
    Ok(UpdateGameResponse::success(record.game_id))
}

/// Every record, most recently created first.
pub async fn list_games(state: &SharedState) -> Result<Vec<GameRecord>, ServiceError> {
    let store = state.require_game_store().await?;
    let records = store.list_games().await?;

    Ok(records.into_iter().map(GameRecord::from).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{dao::game_store::memory::MemoryGameStore, state::AppState};

    fn state() -> SharedState {
        AppState::with_store(Arc::new(MemoryGameStore::new()))
    }

    fn request(game_id: Option<i64>) -> UpdateGameRequest {
        UpdateGameRequest {
            game_id,
            ..UpdateGameRequest::default()
        }
    }

    #[tokio::test]
    async fn test_create_update_list_scenario() {
        let state = state();

        let created = init_game(&state).await.unwrap();
        assert_eq!(created.game_id, 1);

        let update = UpdateGameRequest {
            n_cust_served: Some(Some(10)),
            ..request(Some(1))
        };
        let response = update_game(&state, update).await.unwrap();
        assert_eq!(response, UpdateGameResponse::success(1));

        let records = list_games(&state).await.unwrap();
        assert_eq!(
            records,
            vec![GameRecord {
                game_id: 1,
                n_cust_served: 10,
                n_cust_satisfied: 0,
                n_cust_not_satisfied: 0,
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_game_id_is_invalid_input() {
        let state = state();

        let err = update_game(&state, request(None)).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(ref message) if message == MISSING_GAME_ID));
    }

    #[tokio::test]
    async fn test_missing_game_id_wins_over_degraded_mode() {
        let state = AppState::new();

        let err = update_game(&state, request(None)).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unknown_game_id_is_not_found() {
        let state = state();
        init_game(&state).await.unwrap();

        let update = UpdateGameRequest {
            n_cust_served: Some(Some(8)),
            ..request(Some(99))
        };
        let err = update_game(&state, update).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(ref message) if message == GAME_NOT_FOUND));
        let records = list_games(&state).await.unwrap();
        assert_eq!(records[0].n_cust_served, 0);
    }

    #[tokio::test]
    async fn test_explicit_null_counter_is_rejected_without_mutation() {
        let state = state();
        init_game(&state).await.unwrap();

        let update = UpdateGameRequest {
            n_cust_served: Some(Some(2)),
            n_cust_satisfied: Some(None),
            ..request(Some(1))
        };
        let err = update_game(&state, update).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(list_games(&state).await.unwrap()[0].n_cust_served, 0);
    }

    #[tokio::test]
    async fn test_degraded_mode_refuses_storage_calls() {
        let state = AppState::new();

        assert!(matches!(
            init_game(&state).await,
            Err(ServiceError::Degraded)
        ));
        assert!(matches!(
            list_games(&state).await,
            Err(ServiceError::Degraded)
        ));
    }
}
