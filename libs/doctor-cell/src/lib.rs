pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::directory::DirectoryService;
pub use services::slots::{available_slots, is_offered, parse_slot, SlotCandidate};
