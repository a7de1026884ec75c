use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Registration and login; mounted under `/api/auth`.
pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .with_state(state)
}

/// Authenticated self-service routes; mounted under `/api/users`.
pub fn user_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/doctors/me", get(handlers::doctor_me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
