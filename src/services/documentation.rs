use utoipa::OpenApi;

/// OpenAPI document of every route.
#[derive(OpenApi)]
/// Aggregated OpenAPI document for the game stats API.
#[openapi(
    paths(
        crate::routes::home::home,
        crate::routes::health::healthcheck,
        crate::routes::game::init_game,
        crate::routes::game::update_game,
        crate::routes::game::get_all,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::game::InitGameResponse,
            crate::dto::game::UpdateGameRequest,
            crate::dto::game::UpdateGameResponse,
            crate::dto::game::GameRecord,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Game record creation, update and listing"),
    )
)]
pub struct ApiDoc;
