use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::profile::{Profile, Role};

/// Profile row with both extension tables embedded; at most one of the two
/// is populated (the one matching the role tag).
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRecord {
    #[serde(flatten)]
    pub profile: Profile,
    pub patient_profile: Option<ExtensionRef>,
    pub doctor_profile: Option<ExtensionRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionRef {
    pub profile_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    /// Identity id, usable with the delete and update-role endpoints.
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    /// Role-extension id; null for admins and for profiles whose extension
    /// row is missing.
    pub profile_id: Option<Uuid>,
    pub phone: Option<String>,
}

impl From<ProfileRecord> for UserSummary {
    fn from(record: ProfileRecord) -> Self {
        let extension = match record.profile.role {
            Role::Patient => record.patient_profile.map(|e| e.profile_id),
            Role::Doctor => record.doctor_profile.map(|e| e.profile_id),
            Role::Admin => None,
        };

        Self {
            id: record.profile.identity_id,
            username: record.profile.username,
            email: record.profile.email,
            role: record.profile.role,
            profile_id: extension,
            phone: record.profile.phone,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}
