//! hr-records: employee record keeping behind a session login.
//!
//! Server-rendered pages for registering and signing in users and for
//! adding, editing and deleting employee records stored in SQLite.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod model;
pub mod routes;
pub mod state;
pub mod store;
pub mod views;

use axum::{extract::Extension, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use config::Config;
pub use db::Database;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        // Login, registration, logout
        .merge(routes::auth_router())
        .merge(routes::dashboard_router())
        // Employee CRUD pages
        .merge(routes::employee_router())
        .nest_service("/static", static_files)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
