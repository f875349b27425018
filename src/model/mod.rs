pub mod employee;
pub mod user;
