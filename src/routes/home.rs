use axum::{Router, routing::get};

use crate::state::SharedState;

const BANNER: &str = "Game API running with /init_game and /update_game endpoints.";

/// Plain-text banner confirming the API is up.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = String, content_type = "text/plain"))
)]
pub async fn home() -> &'static str {
    BANNER
}

/// Route serving the banner.
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(home))
}
