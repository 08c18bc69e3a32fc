pub mod appointment;
pub mod auth;
pub mod doctor;
pub mod error;
pub mod user;

pub use appointment::{Appointment, AppointmentFilter};
pub use auth::{Role, Session};
pub use doctor::{Address, BookedSlots, Doctor, DoctorListing, DoctorPatch, DoctorProfile};
pub use error::AppError;
pub use user::{User, UserPatch, UserProfile};
