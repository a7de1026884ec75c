use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Admin user management; mounted under `/api/admin`. Every route requires
/// authentication plus the ADMIN role (checked against the profile row).
pub fn admin_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/list", get(handlers::list_users))
        .route("/delete/{user_id}", delete(handlers::delete_user))
        .route("/update-role/{user_id}", put(handlers::update_role))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
