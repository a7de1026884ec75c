use serde::{Deserialize, Serialize};
use uuid::Uuid;

use catalog_cell::Specialization;

/// Doctor extension row with its owning profile and specialization embedded
/// (`select=*,profile:profiles(username),specialization:specializations(*)`).
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorRecord {
    pub profile_id: Uuid,
    pub specialization_id: Option<Uuid>,
    pub license_number: Option<String>,
    pub rating: f32,
    pub profile: Option<ProfileRef>,
    pub specialization: Option<Specialization>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRef {
    pub username: String,
}

/// Directory entry returned by the doctor endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorSummary {
    pub id: Uuid,
    pub username: Option<String>,
    pub specialization: Option<Specialization>,
    pub rating: f32,
    pub license_number: Option<String>,
}

impl From<DoctorRecord> for DoctorSummary {
    fn from(record: DoctorRecord) -> Self {
        Self {
            id: record.profile_id,
            username: record.profile.map(|p| p.username),
            specialization: record.specialization,
            rating: record.rating,
            license_number: record.license_number,
        }
    }
}
