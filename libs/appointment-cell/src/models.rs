use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Appointment lifecycle status. New appointments always start PENDING;
/// later states are set through explicit updates by the owning parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(AppointmentStatus::Pending),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Appointment row with both party usernames embedded
/// (`patient:patient_profiles(profile:profiles(username))`, same for the
/// doctor side).
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRecord {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient: Option<PartyRef>,
    pub doctor: Option<PartyRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartyRef {
    pub profile: Option<ProfileRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRef {
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
}

impl From<AppointmentRecord> for AppointmentResponse {
    fn from(record: AppointmentRecord) -> Self {
        let name_of = |party: Option<PartyRef>| party.and_then(|p| p.profile).map(|p| p.username);

        Self {
            id: record.appointment.id,
            patient_id: record.appointment.patient_id,
            doctor_id: record.appointment.doctor_id,
            appointment_date: record.appointment.appointment_date,
            status: record.appointment.status,
            notes: record.appointment.notes,
            patient_name: name_of(record.patient),
            doctor_name: name_of(record.doctor),
        }
    }
}

/// Booking input. Status is intentionally absent: clients cannot choose a
/// starting status, and any extra field they send is dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub appointment_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub notes: Option<String>,
}
