use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::profile::Role;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// One of PATIENT, DOCTOR, ADMIN; defaults to PATIENT.
    pub role: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of both register (201) and login (200) responses. `profile_id` is
/// the role-extension id: null for admins and for doctors whose extension
/// row is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub profile_id: Option<Uuid>,
    pub token: String,
}
