//! Data-access layer over the SQLite pool. Each store owns a clone of the
//! pool; every operation is a single statement committed on its own.

pub mod employees;
pub mod sessions;
pub mod users;

pub use employees::EmployeeStore;
pub use sessions::{Session, SessionStore};
pub use users::UserStore;
