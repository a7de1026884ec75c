//! Authorization policy, kept pure so it can be tested without HTTP or the
//! store. Handlers resolve a [`Caller`] first and then ask this module.

use uuid::Uuid;

use crate::error::AppError;
use crate::profile::{Caller, Profile, Role};

/// Visibility of the appointments table for a given caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentScope {
    /// Admin: every appointment.
    All,
    /// Patient extension id: appointments where they are the patient.
    Patient(Uuid),
    /// Doctor extension id: appointments where they are the doctor.
    Doctor(Uuid),
    /// Caller has a role but no extension row; sees nothing.
    Nothing,
}

pub fn require_role(profile: &Profile, role: Role) -> Result<(), AppError> {
    if profile.role == role {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "{} role required",
            role.as_str()
        )))
    }
}

pub fn require_admin(profile: &Profile) -> Result<(), AppError> {
    require_role(profile, Role::Admin)
}

pub fn appointment_scope(caller: &Caller) -> AppointmentScope {
    match (caller.role(), caller.extension_id) {
        (Role::Admin, _) => AppointmentScope::All,
        (Role::Patient, Some(id)) => AppointmentScope::Patient(id),
        (Role::Doctor, Some(id)) => AppointmentScope::Doctor(id),
        (_, None) => AppointmentScope::Nothing,
    }
}

/// Booking rule: only a patient may create an appointment, and only for
/// their own patient profile.
pub fn authorize_booking(caller: &Caller, target_patient_id: Uuid) -> Result<(), AppError> {
    let own_patient_id = match (caller.role(), caller.extension_id) {
        (Role::Patient, Some(id)) => id,
        _ => {
            return Err(AppError::Forbidden(
                "Only patients can book appointments".to_string(),
            ))
        }
    };

    if target_patient_id != own_patient_id {
        return Err(AppError::Forbidden(
            "You can only book an appointment for yourself".to_string(),
        ));
    }

    Ok(())
}

/// Retrieve/update/delete rule: the owning patient, the owning doctor, or an
/// admin.
pub fn may_access_appointment(
    scope: AppointmentScope,
    patient_id: Uuid,
    doctor_id: Uuid,
) -> bool {
    match scope {
        AppointmentScope::All => true,
        AppointmentScope::Patient(id) => id == patient_id,
        AppointmentScope::Doctor(id) => id == doctor_id,
        AppointmentScope::Nothing => false,
    }
}
