use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the storage backend and report whether the service is degraded.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_game_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
                return HealthResponse::degraded();
            }
            HealthResponse::ok()
        }
        Err(_) => {
            warn!("storage unavailable (degraded mode)");
            HealthResponse::degraded()
        }
    }
}
