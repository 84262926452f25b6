//! Library crate for game-stats-back, exposing modules for binaries and integration tests.

/// Startup configuration and database URL parsing.
pub mod config;
/// Storage abstraction and backends.
pub mod dao;
/// Request and response bodies.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// HTTP routes.
pub mod routes;
/// Business logic and background tasks.
pub mod services;
/// Shared application state.
pub mod state;
