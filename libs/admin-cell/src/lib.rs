pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::AdminDashboard;
pub use router::admin_routes;
pub use services::dashboard::DashboardService;
