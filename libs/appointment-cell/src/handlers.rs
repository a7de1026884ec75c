use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::profile::Caller;

use crate::models::{CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::services::booking::BookingService;

async fn resolve_caller(state: &AppConfig, user: &AuthUser) -> Result<Caller, AppError> {
    SupabaseClient::new(state).resolve_caller(user.id).await
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let caller = resolve_caller(&state, &user).await?;

    let booking_service = BookingService::new(&state);
    let appointments = booking_service.list_for_caller(&caller).await?;

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let caller = resolve_caller(&state, &user).await?;

    let booking_service = BookingService::new(&state);
    let appointment = booking_service.book(&caller, request).await?;

    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let caller = resolve_caller(&state, &user).await?;

    let booking_service = BookingService::new(&state);
    let appointment = booking_service
        .get_for_caller(&caller, appointment_id)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let caller = resolve_caller(&state, &user).await?;

    let booking_service = BookingService::new(&state);
    let appointment = booking_service
        .update_for_caller(&caller, appointment_id, request)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let caller = resolve_caller(&state, &user).await?;

    let booking_service = BookingService::new(&state);
    booking_service
        .delete_for_caller(&caller, appointment_id)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Public schedule lookup by the doctor's identity id.
#[axum::debug_handler]
pub async fn doctor_appointments(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);
    let appointments = booking_service.list_for_doctor_identity(doctor_id).await?;

    Ok(Json(json!(appointments)))
}
