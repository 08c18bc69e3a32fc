pub mod payment;
pub mod profile;
