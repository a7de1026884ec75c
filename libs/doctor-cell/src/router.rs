use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

/// Public doctor directory routes; mounted under `/api`.
pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/doctors", get(handlers::search_doctors))
        .route("/doctors/by_disease/{disease_id}", get(handlers::doctors_by_disease))
        .with_state(state)
}
