use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};

use crate::{
    dto::game::{GameRecord, InitGameResponse, UpdateGameRequest, UpdateGameResponse},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes creating, updating and listing game records.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/init_game", post(init_game))
        .route("/update_game", post(update_game))
        .route("/get_all", get(get_all))
}

/// Create a new game record with every counter at zero.
#[utoipa::path(
    post,
    path = "/init_game",
    tag = "game",
    responses(
        (status = 200, description = "Game created", body = InitGameResponse),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn init_game(
    State(state): State<SharedState>,
) -> Result<Json<InitGameResponse>, AppError> {
    let created = game_service::init_game(&state).await?;
    Ok(Json(created))
}

/// Overwrite the counters supplied in the body; omitted counters are left untouched.
#[utoipa::path(
    post,
    path = "/update_game",
    tag = "game",
    request_body = UpdateGameRequest,
    responses(
        (status = 200, description = "Game updated", body = UpdateGameResponse),
        (status = 400, description = "Missing game_id, null counter or malformed body"),
        (status = 404, description = "Game ID not found"),
        (status = 415, description = "Missing JSON content type")
    )
)]
pub async fn update_game(
    State(state): State<SharedState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<UpdateGameResponse>, AppError> {
    let Json(body) = payload?;
    let request = UpdateGameRequest::try_from(body)?;
    let response = game_service::update_game(&state, request).await?;
    Ok(Json(response))
}

/// List every game record, most recent first.
#[utoipa::path(
    get,
    path = "/get_all",
    tag = "game",
    responses((status = 200, description = "All game records", body = [GameRecord]))
)]
pub async fn get_all(State(state): State<SharedState>) -> Result<Json<Vec<GameRecord>>, AppError> {
    let records = game_service::list_games(&state).await?;
    Ok(Json(records))
}
