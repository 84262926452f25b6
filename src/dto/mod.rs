/// Game record bodies.
pub mod game;
/// Health check body.
pub mod health;
