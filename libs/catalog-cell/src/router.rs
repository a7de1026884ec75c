use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

/// Public reference-data routes; mounted under `/api`.
pub fn catalog_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/specializations", get(handlers::list_specializations))
        .route("/specializations/{specialization_id}", get(handlers::get_specialization))
        .route("/diseases", get(handlers::list_diseases))
        .route("/diseases/{disease_id}", get(handlers::get_disease))
        .with_state(state)
}
