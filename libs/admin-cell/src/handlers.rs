use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::policy::require_admin;

use crate::models::UpdateRoleRequest;
use crate::services::users::UserAdminService;

async fn require_admin_caller(state: &AppConfig, user: &AuthUser) -> Result<(), AppError> {
    let supabase = SupabaseClient::new(state);
    let profile = supabase.get_profile_by_identity(user.id).await?;
    require_admin(&profile)
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_admin_caller(&state, &user).await?;

    let admin_service = UserAdminService::new(&state);
    let users = admin_service.list_users().await?;

    Ok(Json(json!(users)))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_admin_caller(&state, &user).await?;

    let admin_service = UserAdminService::new(&state);
    admin_service.delete_user(user_id).await?;

    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn update_role(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin_caller(&state, &user).await?;

    let admin_service = UserAdminService::new(&state);
    let profile = admin_service.update_role(user_id, &request.role).await?;

    Ok(Json(json!({
        "id": profile.identity_id,
        "username": profile.username,
        "role": profile.role,
    })))
}
