pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Appointment, AppointmentResponse, AppointmentStatus};
pub use services::booking::BookingService;
