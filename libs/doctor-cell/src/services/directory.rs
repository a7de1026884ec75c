use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;

use catalog_cell::Disease;

use crate::models::{DoctorRecord, DoctorSummary};

const DOCTOR_SELECT: &str =
    "select=*,profile:profiles(username),specialization:specializations(*)";

/// Read-only doctor directory. Writes to doctor rows happen through
/// registration and admin tooling, not here.
pub struct DoctorDirectoryService {
    supabase: SupabaseClient,
}

impl DoctorDirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// List doctors, optionally narrowed by a free-text search over the
    /// doctor's username and specialization name.
    pub async fn search_doctors(&self, search: Option<&str>) -> Result<Vec<DoctorSummary>, AppError> {
        debug!("Searching doctors with query: {:?}", search);

        let records: Vec<DoctorRecord> = self
            .supabase
            .select(&format!("doctor_profiles?{}", DOCTOR_SELECT))
            .await?;

        let needle = search.map(|s| s.to_lowercase()).unwrap_or_default();
        let doctors = records
            .into_iter()
            .filter(|record| {
                if needle.is_empty() {
                    return true;
                }
                record
                    .profile
                    .as_ref()
                    .is_some_and(|p| p.username.to_lowercase().contains(&needle))
                    || record
                        .specialization
                        .as_ref()
                        .is_some_and(|s| s.name.to_lowercase().contains(&needle))
            })
            .map(DoctorSummary::from)
            .collect();

        Ok(doctors)
    }

    /// Doctors whose specialization matches the given disease's
    /// specialization. Unknown disease ids are a NotFound; a disease without
    /// a specialization matches no doctors.
    pub async fn doctors_by_disease(&self, disease_id: Uuid) -> Result<Vec<DoctorSummary>, AppError> {
        let disease: Disease = self
            .supabase
            .select_one(&format!("diseases?id=eq.{}", disease_id), "Disease")
            .await?;

        let Some(specialization_id) = disease.specialization_id else {
            return Ok(Vec::new());
        };

        let records: Vec<DoctorRecord> = self
            .supabase
            .select(&format!(
                "doctor_profiles?specialization_id=eq.{}&{}",
                specialization_id, DOCTOR_SELECT
            ))
            .await?;

        Ok(records.into_iter().map(DoctorSummary::from).collect())
    }

    /// Single doctor entry by its profile id.
    pub async fn get_doctor(&self, profile_id: Uuid) -> Result<DoctorSummary, AppError> {
        let record: DoctorRecord = self
            .supabase
            .select_one(
                &format!("doctor_profiles?profile_id=eq.{}&{}", profile_id, DOCTOR_SELECT),
                "Doctor profile",
            )
            .await?;

        Ok(record.into())
    }
}
