use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role tag carried on every profile. The role decides which extension row
/// (patient_profiles / doctor_profiles) belongs to the profile; ADMIN has no
/// extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "PATIENT")]
    Patient,
    #[serde(rename = "DOCTOR")]
    Doctor,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "PATIENT",
            Role::Doctor => "DOCTOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PATIENT" => Ok(Role::Patient),
            "DOCTOR" => Ok(Role::Doctor),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// Per-identity profile row. Username and email are denormalized from the
/// identity service at provisioning time so directory queries never have to
/// join the auth schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Patient extension row, keyed by the owning profile id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    pub profile_id: Uuid,
    pub date_of_birth: Option<NaiveDate>,
    pub medical_history: Option<String>,
}

/// Doctor extension row, keyed by the owning profile id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub profile_id: Uuid,
    pub specialization_id: Option<Uuid>,
    pub license_number: Option<String>,
    pub rating: f32,
}

/// Resolved caller context: the profile plus the id of its role-extension
/// row when one exists. A DOCTOR profile without a doctor_profiles row
/// resolves to `extension_id: None` rather than an error.
#[derive(Debug, Clone)]
pub struct Caller {
    pub profile: Profile,
    pub extension_id: Option<Uuid>,
}

impl Caller {
    pub fn role(&self) -> Role {
        self.profile.role
    }
}
