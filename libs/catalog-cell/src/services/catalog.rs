use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{DiseaseRecord, DiseaseResponse, Specialization};

/// Read-only access to the medical reference data. No write path exists on
/// purpose; specializations and diseases are maintained out of band.
pub struct CatalogService {
    supabase: SupabaseClient,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_specializations(&self) -> Result<Vec<Specialization>, AppError> {
        self.supabase.select("specializations?order=name.asc").await
    }

    pub async fn get_specialization(&self, id: Uuid) -> Result<Specialization, AppError> {
        self.supabase
            .select_one(&format!("specializations?id=eq.{}", id), "Specialization")
            .await
    }

    /// List diseases, optionally narrowed by a free-text search over the
    /// disease name and the related specialization name. Reference data is
    /// small, so the match runs over the fetched rows.
    pub async fn list_diseases(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<DiseaseResponse>, AppError> {
        debug!("Listing diseases with search: {:?}", search);

        let records: Vec<DiseaseRecord> = self
            .supabase
            .select("diseases?select=*,specialization:specializations(name)&order=name.asc")
            .await?;

        let needle = search.map(|s| s.to_lowercase()).unwrap_or_default();
        let diseases = records
            .into_iter()
            .filter(|record| {
                if needle.is_empty() {
                    return true;
                }
                record.name.to_lowercase().contains(&needle)
                    || record
                        .specialization
                        .as_ref()
                        .is_some_and(|s| s.name.to_lowercase().contains(&needle))
            })
            .map(DiseaseResponse::from)
            .collect();

        Ok(diseases)
    }

    pub async fn get_disease(&self, id: Uuid) -> Result<DiseaseResponse, AppError> {
        let record: DiseaseRecord = self
            .supabase
            .select_one(
                &format!(
                    "diseases?id=eq.{}&select=*,specialization:specializations(name)",
                    id
                ),
                "Disease",
            )
            .await?;

        Ok(record.into())
    }
}
