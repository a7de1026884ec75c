use std::str::FromStr;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;
use shared_models::profile::{Profile, Role};

use crate::models::{ProfileRecord, UserSummary};

/// Admin-only user management. Role checks happen in the handlers before
/// these methods run.
pub struct UserAdminService {
    supabase: SupabaseClient,
}

impl UserAdminService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let records: Vec<ProfileRecord> = self
            .supabase
            .select(
                "profiles?select=*,patient_profile:patient_profiles(profile_id),\
                 doctor_profile:doctor_profiles(profile_id)&order=created_at.asc",
            )
            .await?;

        Ok(records.into_iter().map(UserSummary::from).collect())
    }

    /// Delete the identity; the store cascades to the profile and extension.
    pub async fn delete_user(&self, identity_id: Uuid) -> Result<(), AppError> {
        info!("Deleting identity {}", identity_id);
        self.supabase.admin_delete_user(identity_id).await
    }

    /// Change the role tag on a profile, looked up by identity id. As in the
    /// original system this does not reconcile extension rows: a PATIENT
    /// promoted to DOCTOR keeps the patient extension and gains no doctor
    /// extension until one is provisioned separately.
    pub async fn update_role(&self, identity_id: Uuid, role: &str) -> Result<Profile, AppError> {
        let role = Role::from_str(role).map_err(|_| {
            AppError::ValidationError("role must be one of PATIENT, DOCTOR, ADMIN".to_string())
        })?;

        let mut updated: Vec<Profile> = self
            .supabase
            .update(
                &format!("profiles?identity_id=eq.{}", identity_id),
                json!({ "role": role }),
            )
            .await?;

        if updated.is_empty() {
            return Err(AppError::NotFound("Profile not found".to_string()));
        }

        info!("Updated role of identity {} to {}", identity_id, role);
        Ok(updated.remove(0))
    }
}
