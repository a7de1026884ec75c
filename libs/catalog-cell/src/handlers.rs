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

use crate::services::catalog::CatalogService;

#[derive(Debug, Deserialize)]
pub struct DiseaseSearchQuery {
    pub search: Option<String>,
}

#[axum::debug_handler]
pub async fn list_specializations(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    let specializations = catalog.list_specializations().await?;

    Ok(Json(json!(specializations)))
}

#[axum::debug_handler]
pub async fn get_specialization(
    State(state): State<Arc<AppConfig>>,
    Path(specialization_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    let specialization = catalog.get_specialization(specialization_id).await?;

    Ok(Json(json!(specialization)))
}

#[axum::debug_handler]
pub async fn list_diseases(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DiseaseSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    let diseases = catalog.list_diseases(query.search.as_deref()).await?;

    Ok(Json(json!(diseases)))
}

#[axum::debug_handler]
pub async fn get_disease(
    State(state): State<Arc<AppConfig>>,
    Path(disease_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    let disease = catalog.get_disease(disease_id).await?;

    Ok(Json(json!(disease)))
}
