pub mod auth;
pub mod dashboard;
pub mod employees;

pub use auth::auth_router;
pub use dashboard::dashboard_router;
pub use employees::employee_router;
