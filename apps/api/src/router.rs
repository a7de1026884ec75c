use std::sync::Arc;

use axum::{routing::get, Router};

use admin_cell::router::admin_routes;
use appointment_cell::router::appointment_routes;
use auth_cell::router::{auth_routes, user_routes};
use catalog_cell::router::catalog_routes;
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Hospital Appointments API is running!" }))
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/users", user_routes(state.clone()))
        .nest("/api/admin", admin_routes(state.clone()))
        .nest(
            "/api",
            catalog_routes(state.clone())
                .merge(doctor_routes(state.clone()))
                .merge(appointment_routes(state)),
        )
}
