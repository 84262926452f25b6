use axum::Router;

use crate::state::SharedState;

/// Swagger UI and OpenAPI document.
pub mod docs;
/// Game record endpoints.
pub mod game;
/// Health check endpoint.
pub mod health;
/// Banner at `/`.
pub mod home;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    home::router()
        .merge(health::router())
        .merge(game::router())
        .merge(docs::router())
        .with_state(state)
}
