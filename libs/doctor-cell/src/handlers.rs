use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::services::directory::DoctorDirectoryService;

#[derive(Debug, Deserialize)]
pub struct DoctorSearchQuery {
    pub search: Option<String>,
}

#[axum::debug_handler]
pub async fn search_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DoctorSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let directory = DoctorDirectoryService::new(&state);
    let doctors = directory.search_doctors(query.search.as_deref()).await?;

    Ok(Json(json!(doctors)))
}

#[axum::debug_handler]
pub async fn doctors_by_disease(
    State(state): State<Arc<AppConfig>>,
    Path(disease_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let directory = DoctorDirectoryService::new(&state);
    let doctors = directory.doctors_by_disease(disease_id).await?;

    Ok(Json(json!(doctors)))
}
