use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use doctor_cell::DoctorDirectoryService;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::policy::require_role;
use shared_models::profile::Role;

use crate::models::{LoginRequest, RegisterRequest, SessionResponse};
use crate::services::account::AccountService;

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let account_service = AccountService::new(&state);
    let session = account_service.register(request).await?;

    Ok((StatusCode::CREATED, Json(session)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let account_service = AccountService::new(&state);
    let session = account_service.login(request).await?;

    Ok(Json(session))
}

/// Profile of the currently logged-in doctor.
#[axum::debug_handler]
pub async fn doctor_me(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let supabase = SupabaseClient::new(&state);
    let profile = supabase.get_profile_by_identity(user.id).await?;
    require_role(&profile, Role::Doctor)?;

    let directory = DoctorDirectoryService::new(&state);
    let doctor = directory.get_doctor(profile.id).await?;

    Ok(Json(json!(doctor)))
}
