use std::sync::Arc;

use axum::{
    middleware,
    routing::get,
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Appointment routes; mounted under `/api`. The per-doctor schedule is
/// public, everything else requires authentication.
pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new().route(
        "/appointments/doctors/{doctor_id}/appointments",
        get(handlers::doctor_appointments),
    );

    let protected_routes = Router::new()
        .route(
            "/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/appointments/{appointment_id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
