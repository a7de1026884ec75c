use std::str::FromStr;

use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;
use shared_models::policy::{
    appointment_scope, authorize_booking, may_access_appointment, AppointmentScope,
};
use shared_models::profile::{Caller, Profile};

use crate::models::{
    Appointment, AppointmentRecord, AppointmentResponse, AppointmentStatus,
    CreateAppointmentRequest, UpdateAppointmentRequest,
};

const APPOINTMENT_SELECT: &str = "select=*,\
    patient:patient_profiles(profile:profiles(username)),\
    doctor:doctor_profiles(profile:profiles(username))";

/// Booking and appointment access. All listings come back ascending by
/// appointment date so clients render a chronological plan.
pub struct BookingService {
    supabase: SupabaseClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Appointments visible to the caller: own bookings for a patient, own
    /// schedule for a doctor, everything for an admin.
    pub async fn list_for_caller(
        &self,
        caller: &Caller,
    ) -> Result<Vec<AppointmentResponse>, AppError> {
        let filter = match appointment_scope(caller) {
            AppointmentScope::All => String::new(),
            AppointmentScope::Patient(id) => format!("patient_id=eq.{}&", id),
            AppointmentScope::Doctor(id) => format!("doctor_id=eq.{}&", id),
            AppointmentScope::Nothing => return Ok(Vec::new()),
        };

        let records: Vec<AppointmentRecord> = self
            .supabase
            .select(&format!(
                "appointments?{}{}&order=appointment_date.asc",
                filter, APPOINTMENT_SELECT
            ))
            .await?;

        Ok(records.into_iter().map(AppointmentResponse::from).collect())
    }

    /// Book an appointment. The caller must be the patient being booked for;
    /// the status is forced to PENDING no matter what the client sent.
    pub async fn book(
        &self,
        caller: &Caller,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        authorize_booking(caller, request.patient_id)?;

        let doctor_exists = self
            .supabase
            .exists(&format!(
                "doctor_profiles?profile_id=eq.{}&select=profile_id",
                request.doctor_id
            ))
            .await?;
        if !doctor_exists {
            return Err(AppError::ValidationError(
                "Invalid patient or doctor ID provided".to_string(),
            ));
        }

        let appointment: Appointment = self
            .supabase
            .insert(
                "appointments",
                json!({
                    "patient_id": request.patient_id,
                    "doctor_id": request.doctor_id,
                    "appointment_date": request.appointment_date,
                    "status": AppointmentStatus::Pending,
                    "notes": request.notes,
                }),
            )
            .await?;

        info!(
            "Booked appointment {} for patient {} with doctor {}",
            appointment.id, appointment.patient_id, appointment.doctor_id
        );
        Ok(appointment)
    }

    pub async fn get_for_caller(
        &self,
        caller: &Caller,
        appointment_id: Uuid,
    ) -> Result<AppointmentResponse, AppError> {
        let record = self.fetch(appointment_id).await?;
        self.check_access(caller, &record.appointment)?;
        Ok(record.into())
    }

    pub async fn update_for_caller(
        &self,
        caller: &Caller,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<AppointmentResponse, AppError> {
        let record = self.fetch(appointment_id).await?;
        self.check_access(caller, &record.appointment)?;

        let mut update_data = Map::new();
        if let Some(date) = request.appointment_date {
            update_data.insert("appointment_date".to_string(), json!(date));
        }
        if let Some(raw) = request.status {
            let status = AppointmentStatus::from_str(&raw).map_err(|_| {
                AppError::ValidationError(
                    "status must be one of PENDING, CONFIRMED, COMPLETED, CANCELLED".to_string(),
                )
            })?;
            update_data.insert("status".to_string(), json!(status));
        }
        if let Some(notes) = request.notes {
            update_data.insert("notes".to_string(), json!(notes));
        }

        if update_data.is_empty() {
            return Ok(record.into());
        }

        debug!("Updating appointment {}: {:?}", appointment_id, update_data);

        let updated: Vec<Appointment> = self
            .supabase
            .update(
                &format!("appointments?id=eq.{}", appointment_id),
                Value::Object(update_data),
            )
            .await?;
        if updated.is_empty() {
            return Err(AppError::NotFound("Appointment not found".to_string()));
        }

        self.fetch(appointment_id).await.map(Into::into)
    }

    pub async fn delete_for_caller(
        &self,
        caller: &Caller,
        appointment_id: Uuid,
    ) -> Result<(), AppError> {
        let record = self.fetch(appointment_id).await?;
        self.check_access(caller, &record.appointment)?;

        let _deleted: Vec<Appointment> = self
            .supabase
            .delete(&format!("appointments?id=eq.{}", appointment_id))
            .await?;

        info!("Deleted appointment {}", appointment_id);
        Ok(())
    }

    /// Appointments of the doctor owning the given identity, ascending by
    /// date. NotFound when the identity has no doctor extension.
    pub async fn list_for_doctor_identity(
        &self,
        identity_id: Uuid,
    ) -> Result<Vec<AppointmentResponse>, AppError> {
        let profile: Profile = self
            .supabase
            .select_one(
                &format!("profiles?identity_id=eq.{}", identity_id),
                "Doctor profile",
            )
            .await?;

        let is_doctor = self
            .supabase
            .exists(&format!(
                "doctor_profiles?profile_id=eq.{}&select=profile_id",
                profile.id
            ))
            .await?;
        if !is_doctor {
            return Err(AppError::NotFound("Doctor profile not found".to_string()));
        }

        let records: Vec<AppointmentRecord> = self
            .supabase
            .select(&format!(
                "appointments?doctor_id=eq.{}&{}&order=appointment_date.asc",
                profile.id, APPOINTMENT_SELECT
            ))
            .await?;

        Ok(records.into_iter().map(AppointmentResponse::from).collect())
    }

    async fn fetch(&self, appointment_id: Uuid) -> Result<AppointmentRecord, AppError> {
        self.supabase
            .select_one(
                &format!("appointments?id=eq.{}&{}", appointment_id, APPOINTMENT_SELECT),
                "Appointment",
            )
            .await
    }

    fn check_access(&self, caller: &Caller, appointment: &Appointment) -> Result<(), AppError> {
        let scope = appointment_scope(caller);
        if !may_access_appointment(scope, appointment.patient_id, appointment.doctor_id) {
            return Err(AppError::Forbidden(
                "Not authorized to access this appointment".to_string(),
            ));
        }
        Ok(())
    }
}
