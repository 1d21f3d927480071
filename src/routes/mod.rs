use crate::models::AppState;
use axum::Router;
use serde::Serialize;

pub mod appointment_routes;
pub mod auth_routes;
pub mod queue_routes;
pub mod user_routes;

/// Uniform success envelope, mirroring the error envelope in error.rs.
#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1/auth", auth_routes::router())
        .nest("/api/v1/appointments", appointment_routes::router())
        .nest("/api/v1/users", user_routes::router())
        .nest("/api/v1/queue", queue_routes::router())
        .with_state(state)
}
