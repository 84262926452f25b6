/// OpenAPI documentation generation.
pub mod documentation;
/// Create, update and list game records.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Background connection and health supervision of the storage backend.
pub mod storage_supervisor;
